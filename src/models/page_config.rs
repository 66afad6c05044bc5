//! 页面版式配置
//!
//! `PageConfig` 是 JSON 配置里 `defaults` / `documents.<type>` 的类型化形式，
//! `PdfOptions` 是导出时真正交给浏览器的部分（不含超时）。

use serde::{Deserialize, Serialize};

/// 导航等待的默认超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// 横向页面缺省纸张
pub const DEFAULT_FORMAT: &str = "A4";

/// 页边距
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
}

/// 页面版式配置
///
/// 所有字段都是可选的，缺失表示"不设置"，而不是某个默认值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub format: Option<String>,
    pub landscape: Option<bool>,
    pub margin: Option<Margin>,
    pub header_template: Option<String>,
    pub footer_template: Option<String>,
    pub print_background: Option<bool>,
    pub display_header_footer: Option<bool>,
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: Option<bool>,
    pub scale: Option<f64>,
    /// 导航超时（毫秒），只用于页面加载
    pub timeout: Option<u64>,
}

impl PageConfig {
    /// 浅合并：`overrides` 中存在的键覆盖当前值，其余保留
    ///
    /// `margin` 作为整体替换，不做深合并。
    pub fn merge(&self, overrides: &PageConfig) -> PageConfig {
        PageConfig {
            format: overrides.format.clone().or_else(|| self.format.clone()),
            landscape: overrides.landscape.or(self.landscape),
            margin: overrides.margin.clone().or_else(|| self.margin.clone()),
            header_template: overrides
                .header_template
                .clone()
                .or_else(|| self.header_template.clone()),
            footer_template: overrides
                .footer_template
                .clone()
                .or_else(|| self.footer_template.clone()),
            print_background: overrides.print_background.or(self.print_background),
            display_header_footer: overrides
                .display_header_footer
                .or(self.display_header_footer),
            prefer_css_page_size: overrides.prefer_css_page_size.or(self.prefer_css_page_size),
            scale: overrides.scale.or(self.scale),
            timeout: overrides.timeout.or(self.timeout),
        }
    }

    /// 导航超时，未配置或为 0 时为 30 秒
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.filter(|ms| *ms > 0).unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// 导出参数（去掉 timeout）
    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            format: self.format.clone(),
            landscape: self.landscape,
            margin: self.margin.clone(),
            header_template: self.header_template.clone(),
            footer_template: self.footer_template.clone(),
            print_background: self.print_background,
            display_header_footer: self.display_header_footer,
            prefer_css_page_size: self.prefer_css_page_size,
            scale: self.scale,
        }
    }
}

/// 导出参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfOptions {
    pub format: Option<String>,
    pub landscape: Option<bool>,
    pub margin: Option<Margin>,
    pub header_template: Option<String>,
    pub footer_template: Option<String>,
    pub print_background: Option<bool>,
    pub display_header_footer: Option<bool>,
    pub prefer_css_page_size: Option<bool>,
    pub scale: Option<f64>,
}

/// 纸张尺寸（英寸，宽 × 高），大小写不敏感
pub fn paper_size_inches(format: &str) -> Option<(f64, f64)> {
    let size = match format.to_ascii_lowercase().as_str() {
        "letter" => (8.5, 11.0),
        "legal" => (8.5, 14.0),
        "tabloid" => (11.0, 17.0),
        "ledger" => (17.0, 11.0),
        "a0" => (33.1, 46.8),
        "a1" => (23.4, 33.1),
        "a2" => (16.54, 23.4),
        "a3" => (11.7, 16.54),
        "a4" => (8.27, 11.7),
        "a5" => (5.83, 8.27),
        "a6" => (4.13, 5.83),
        _ => return None,
    };
    Some(size)
}

/// 把 CSS 长度（`1in`、`20mm`、`2cm`、`72px`、`12pt`、纯数字按 px）换算成英寸
pub fn length_to_inches(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, pixels_per_unit) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, 96.0)
    } else if let Some(n) = value.strip_suffix("cm") {
        (n, 37.8)
    } else if let Some(n) = value.strip_suffix("mm") {
        (n, 3.78)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 96.0 / 72.0)
    } else {
        (value.as_str(), 1.0)
    };
    let number: f64 = number.trim().parse().ok()?;
    Some(number * pixels_per_unit / 96.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PageConfig {
        PageConfig {
            format: Some("A4".to_string()),
            margin: Some(Margin {
                top: Some("1in".to_string()),
                right: Some("0.75in".to_string()),
                bottom: Some("1in".to_string()),
                left: Some("0.75in".to_string()),
            }),
            print_background: Some(true),
            timeout: Some(45_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_override_wins_and_keeps_rest() {
        let overrides = PageConfig {
            landscape: Some(true),
            ..Default::default()
        };
        let merged = defaults().merge(&overrides);

        assert_eq!(merged.format.as_deref(), Some("A4"));
        assert_eq!(merged.landscape, Some(true));
        assert_eq!(merged.margin, defaults().margin);
        assert_eq!(merged.timeout, Some(45_000));
    }

    #[test]
    fn test_merge_replaces_margin_whole() {
        let overrides = PageConfig {
            margin: Some(Margin {
                top: Some("0".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = defaults().merge(&overrides);
        let margin = merged.margin.unwrap();

        assert_eq!(margin.top.as_deref(), Some("0"));
        assert_eq!(margin.left, None);
    }

    #[test]
    fn test_merge_with_empty_override_is_identity() {
        assert_eq!(defaults().merge(&PageConfig::default()), defaults());
    }

    #[test]
    fn test_pdf_options_drop_timeout() {
        let options = defaults().pdf_options();
        assert_eq!(options.format.as_deref(), Some("A4"));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(defaults().timeout_ms(), 45_000);
        assert_eq!(PageConfig::default().timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let config = PageConfig {
            timeout: Some(0),
            ..Default::default()
        };
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_deserialize_camel_case_keys() {
        let json = r#"{
            "format": "Letter",
            "landscape": true,
            "headerTemplate": "<span></span>",
            "preferCSSPageSize": true,
            "timeout": 60000
        }"#;
        let config: PageConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format.as_deref(), Some("Letter"));
        assert_eq!(config.header_template.as_deref(), Some("<span></span>"));
        assert_eq!(config.prefer_css_page_size, Some(true));
        assert_eq!(config.timeout, Some(60_000));
    }

    #[test]
    fn test_length_units() {
        assert_eq!(length_to_inches("1in"), Some(1.0));
        assert_eq!(length_to_inches("96px"), Some(1.0));
        assert_eq!(length_to_inches("72pt"), Some(1.0));
        assert_eq!(length_to_inches("48"), Some(0.5));
        assert!((length_to_inches("25.4mm").unwrap() - 1.0).abs() < 0.01);
        assert!((length_to_inches("2.54cm").unwrap() - 1.0).abs() < 0.01);
        assert_eq!(length_to_inches("wide"), None);
    }

    #[test]
    fn test_paper_sizes() {
        assert_eq!(paper_size_inches("a4"), Some((8.27, 11.7)));
        assert_eq!(paper_size_inches("Letter"), Some((8.5, 11.0)));
        assert_eq!(paper_size_inches("B5"), None);
    }
}
