//! 导出配置文件（config.json）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::models::page_config::PageConfig;
use crate::models::qr_config::QrConfig;

/// 额外等待条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitConditions {
    #[serde(default, rename = "waitForSVGs")]
    pub wait_for_svgs: bool,
    #[serde(default)]
    pub wait_for_images: bool,
    /// 固定额外等待（毫秒）
    #[serde(default)]
    pub additional_wait_time: Option<u64>,
}

/// 封面页配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverPageConfig {
    /// 路径中包含任一子串即生成封面
    pub patterns: Vec<String>,
    /// 从第一个 h1 中去掉的前缀（大小写不敏感）
    pub title_prefix: String,
    /// 封面副标题
    pub subtitle: Option<String>,
}

impl Default for CoverPageConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["inception-report".to_string()],
            title_prefix: "Inception Report:".to_string(),
            subtitle: None,
        }
    }
}

impl CoverPageConfig {
    /// 该路径是否需要封面
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && path.contains(pattern.as_str()))
    }
}

/// 导出配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// 全局默认版式
    #[serde(default)]
    pub defaults: PageConfig,
    /// 按文档类型覆盖的版式
    #[serde(default)]
    pub documents: HashMap<String, PageConfig>,
    /// 路径包含任一子串的文件不转换
    #[serde(default)]
    pub exclude_files: Vec<String>,
    #[serde(default)]
    pub qr_code: Option<QrConfig>,
    #[serde(default)]
    pub wait_conditions: Option<WaitConditions>,
    #[serde(default)]
    pub cover_page: CoverPageConfig,
}

impl ExportConfig {
    /// 从 JSON 文件加载配置
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;

        Self::from_json(&content).with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 二维码是否启用
    pub fn qr_enabled(&self) -> bool {
        self.qr_code.as_ref().is_some_and(|qr| qr.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "defaults": {
            "format": "A4",
            "printBackground": true,
            "margin": { "top": "1in", "right": "0.75in", "bottom": "1in", "left": "0.75in" },
            "timeout": 30000
        },
        "documents": {
            "dashboard": { "landscape": true },
            "inception": { "format": "Letter" }
        },
        "excludeFiles": ["404.html", "_observablehq"],
        "qrCode": { "enabled": true, "baseUrl": "https://example.org/" },
        "waitConditions": { "waitForSVGs": true, "waitForImages": false, "additionalWaitTime": 500 }
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = ExportConfig::from_json(SAMPLE).unwrap();

        assert_eq!(config.defaults.format.as_deref(), Some("A4"));
        assert_eq!(config.exclude_files.len(), 2);
        assert!(config.qr_enabled());
        assert!(config.documents.contains_key("dashboard"));
        assert!(!config.documents.contains_key("chart"));

        let waits = config.wait_conditions.unwrap();
        assert!(waits.wait_for_svgs);
        assert!(!waits.wait_for_images);
        assert_eq!(waits.additional_wait_time, Some(500));

        assert_eq!(config.cover_page, CoverPageConfig::default());
    }

    #[test]
    fn test_minimal_config() {
        let config = ExportConfig::from_json("{}").unwrap();
        assert_eq!(config.defaults, PageConfig::default());
        assert!(!config.qr_enabled());
        assert!(config.wait_conditions.is_none());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(ExportConfig::from_json("{ \"defaults\": ").is_err());
        assert!(ExportConfig::from_json("{ \"excludeFiles\": \"404\" }").is_err());
    }

    #[test]
    fn test_cover_page_matching() {
        let cover = CoverPageConfig::default();
        assert!(cover.matches(Path::new("/dist/inception-report.html")));
        assert!(!cover.matches(Path::new("/dist/interim-report.html")));

        let custom: CoverPageConfig =
            serde_json::from_str(r#"{ "patterns": ["annual"], "subtitle": "FY25" }"#).unwrap();
        assert!(custom.matches(Path::new("/dist/annual-review.html")));
        assert_eq!(custom.title_prefix, "Inception Report:");
        assert_eq!(custom.subtitle.as_deref(), Some("FY25"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ExportConfig::load(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("无法读取配置文件"));
    }
}
