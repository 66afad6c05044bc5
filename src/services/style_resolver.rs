//! 样式服务 - 业务能力层
//!
//! 只负责"版式配置 → CSS"能力：合并版式配置、生成 @page 规则、缓存打印样式表

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::models::document::DocumentType;
use crate::models::export_config::ExportConfig;
use crate::models::page_config::{PageConfig, DEFAULT_FORMAT};

/// 样式服务
///
/// 职责：
/// - 按文档类型合并版式配置
/// - 读取打印样式表（只读一次，之后所有文档共享）
pub struct StyleResolver {
    defaults: PageConfig,
    overrides: HashMap<String, PageConfig>,
    stylesheet_path: PathBuf,
    stylesheet: OnceCell<String>,
}

impl StyleResolver {
    /// 创建新的样式服务
    pub fn new(config: &ExportConfig, stylesheet_path: impl Into<PathBuf>) -> Self {
        Self {
            defaults: config.defaults.clone(),
            overrides: config.documents.clone(),
            stylesheet_path: stylesheet_path.into(),
            stylesheet: OnceCell::new(),
        }
    }

    /// 某类文档的版式配置：默认值 + 类型覆盖（覆盖优先）
    pub fn resolve_page_config(&self, doc_type: DocumentType) -> PageConfig {
        match self.overrides.get(doc_type.as_str()) {
            Some(overrides) => self.defaults.merge(overrides),
            None => self.defaults.clone(),
        }
    }

    /// 读取打印样式表，首次读取后缓存
    pub async fn load_styles(&self) -> Result<&str> {
        let styles = self
            .stylesheet
            .get_or_try_init(|| async {
                debug!("读取打印样式表: {}", self.stylesheet_path.display());
                tokio::fs::read_to_string(&self.stylesheet_path)
                    .await
                    .map_err(|e| ExportError::file(&self.stylesheet_path, e))
            })
            .await?;
        Ok(styles.as_str())
    }
}

/// 根据版式配置生成 @page 规则
///
/// 每条规则只在对应键存在时生成；空配置返回空字符串。
pub fn generate_page_styles(config: &PageConfig) -> String {
    let mut styles = Vec::new();

    if let Some(format) = &config.format {
        styles.push(format!("@page {{ size: {}; }}", format));
    }

    if config.landscape == Some(true) {
        let format = config.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        styles.push(format!("@page {{ size: {} landscape; }}", format));
    }

    if let Some(margin) = &config.margin {
        let side = |value: &Option<String>| value.clone().unwrap_or_else(|| "0".to_string());
        styles.push(format!(
            "@page {{ margin: {} {} {} {}; }}",
            side(&margin.top),
            side(&margin.right),
            side(&margin.bottom),
            side(&margin.left)
        ));
    }

    if let Some(header) = &config.header_template {
        styles.push(format!(
            "@page {{ @top-center {{ content: \"{}\"; }} }}",
            css_string(header)
        ));
    }

    if let Some(footer) = &config.footer_template {
        styles.push(format!(
            "@page {{ @bottom-center {{ content: \"{}\"; }} }}",
            css_string(footer)
        ));
    }

    styles.join("\n")
}

/// 页脚使用的渲染日期，例如 `October 16, 2026`
pub fn format_render_date(now: DateTime<Local>) -> String {
    now.format("%B %-d, %Y").to_string()
}

/// 把日期写成 CSS 自定义属性，供样式表中的页脚引用
pub fn render_date_rule(date: &str) -> String {
    format!(":root {{ --render-date: \"{}\"; }}", css_string(date))
}

fn css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page_config::Margin;
    use chrono::TimeZone;

    fn config() -> ExportConfig {
        ExportConfig::from_json(
            r#"{
                "defaults": {
                    "format": "A4",
                    "margin": { "top": "1in", "right": "0.5in", "bottom": "1in", "left": "0.5in" }
                },
                "documents": { "dashboard": { "landscape": true } }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_without_override_returns_defaults() {
        let resolver = StyleResolver::new(&config(), "styles.css");
        for doc_type in [
            DocumentType::Report,
            DocumentType::Chart,
            DocumentType::Index,
            DocumentType::Default,
        ] {
            assert_eq!(resolver.resolve_page_config(doc_type), config().defaults);
        }
    }

    #[test]
    fn test_resolve_with_override() {
        let resolver = StyleResolver::new(&config(), "styles.css");
        let resolved = resolver.resolve_page_config(DocumentType::Dashboard);

        assert_eq!(resolved.format.as_deref(), Some("A4"));
        assert_eq!(resolved.landscape, Some(true));
        assert_eq!(resolved.margin, config().defaults.margin);
    }

    #[test]
    fn test_page_styles_size_and_landscape() {
        let css = generate_page_styles(&PageConfig {
            format: Some("A4".to_string()),
            landscape: Some(true),
            ..Default::default()
        });
        assert_eq!(css, "@page { size: A4; }\n@page { size: A4 landscape; }");
    }

    #[test]
    fn test_page_styles_landscape_falls_back_to_a4() {
        let css = generate_page_styles(&PageConfig {
            landscape: Some(true),
            ..Default::default()
        });
        assert_eq!(css, "@page { size: A4 landscape; }");
    }

    #[test]
    fn test_page_styles_empty_config() {
        assert_eq!(generate_page_styles(&PageConfig::default()), "");
        let css = generate_page_styles(&PageConfig {
            landscape: Some(false),
            ..Default::default()
        });
        assert_eq!(css, "");
    }

    #[test]
    fn test_page_styles_margin_and_templates() {
        let css = generate_page_styles(&PageConfig {
            margin: Some(Margin {
                top: Some("1in".to_string()),
                right: Some("2in".to_string()),
                bottom: Some("3in".to_string()),
                left: Some("4in".to_string()),
            }),
            header_template: Some("Draft".to_string()),
            footer_template: Some("Say \"hi\"".to_string()),
            ..Default::default()
        });
        let lines: Vec<&str> = css.lines().collect();

        assert_eq!(lines[0], "@page { margin: 1in 2in 3in 4in; }");
        assert_eq!(lines[1], "@page { @top-center { content: \"Draft\"; } }");
        assert_eq!(lines[2], "@page { @bottom-center { content: \"Say \\\"hi\\\"\"; } }");
    }

    #[test]
    fn test_render_date() {
        let date = Local.with_ymd_and_hms(2026, 10, 6, 9, 0, 0).unwrap();
        assert_eq!(format_render_date(date), "October 6, 2026");
        assert_eq!(
            render_date_rule("October 6, 2026"),
            ":root { --render-date: \"October 6, 2026\"; }"
        );
    }

    #[tokio::test]
    async fn test_load_styles_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.css");
        std::fs::write(&path, "body { color: black; }").unwrap();

        let resolver = StyleResolver::new(&ExportConfig::default(), &path);
        assert_eq!(resolver.load_styles().await.unwrap(), "body { color: black; }");

        // 缓存后不再读取磁盘
        std::fs::remove_file(&path).unwrap();
        assert_eq!(resolver.load_styles().await.unwrap(), "body { color: black; }");
    }

    #[test]
    fn test_load_styles_missing_file() {
        let resolver = StyleResolver::new(&ExportConfig::default(), "/no/such/styles.css");
        let result = tokio_test::block_on(resolver.load_styles());
        assert!(matches!(result, Err(ExportError::File { .. })));
    }
}
