use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::models::page_config::PageConfig;

/// 文档类型
///
/// 由文件名（去掉 `.html`）推断，按 dashboard → report → chart → index 的顺序
/// 取第一个命中的类型，都不命中时为 default。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Dashboard,
    Report,
    Chart,
    Index,
    Default,
}

impl DocumentType {
    /// 根据文件路径推断文档类型
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.strip_suffix(".html").unwrap_or(name))
            .unwrap_or_default();

        if stem.contains("dashboard") {
            DocumentType::Dashboard
        } else if stem.contains("report") {
            DocumentType::Report
        } else if stem.contains("chart") {
            DocumentType::Chart
        } else if stem == "index" {
            DocumentType::Index
        } else {
            DocumentType::Default
        }
    }

    /// 配置文件中使用的键名
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dashboard => "dashboard",
            DocumentType::Report => "report",
            DocumentType::Chart => "chart",
            DocumentType::Index => "index",
            DocumentType::Default => "default",
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 待转换文档
///
/// 在扫描阶段创建，之后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDescriptor {
    /// 输入文件的绝对路径
    pub path: PathBuf,
    pub doc_type: DocumentType,
    /// 合并后的版式配置
    pub page_config: PageConfig,
}

impl DocumentDescriptor {
    pub fn new(path: PathBuf, page_config: PageConfig) -> Self {
        let doc_type = DocumentType::from_path(&path);
        Self {
            path,
            doc_type,
            page_config,
        }
    }

    /// `file://` 形式的地址
    pub fn file_url(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// 文件名（仅用于日志显示）
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
