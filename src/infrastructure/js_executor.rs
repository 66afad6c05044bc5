//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS / 读写 DOM / 导出 PDF"的能力

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::Result;
use crate::infrastructure::render::{RenderContext, Viewport};
use crate::models::page_config::{length_to_inches, paper_size_inches, PdfOptions};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 实现 `RenderContext`
/// - 不认识文档类型和配置
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 表达式
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }
}

impl RenderContext for JsExecutor {
    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            viewport.width as i64,
            viewport.height as i64,
            viewport.device_scale_factor,
            false,
        );
        self.page.execute(params).await?;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<JsonValue> {
        self.eval(script).await
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn set_content(&self, html: &str) -> Result<()> {
        self.page.set_content(html).await?;
        Ok(())
    }

    async fn print_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        Ok(self.page.pdf(print_params(options)).await?)
    }

    async fn close(self) -> Result<()> {
        self.page.close().await?;
        Ok(())
    }
}

/// 导出参数转换为 CDP 参数
///
/// 纸张和边距统一换算成英寸。无法识别的纸张交给浏览器默认；
/// 边距未配置或无法识别时为 0。
pub fn print_params(options: &PdfOptions) -> PrintToPdfParams {
    let paper = options.format.as_deref().and_then(paper_size_inches);
    let margin = options.margin.clone().unwrap_or_default();
    let side = |value: &Option<String>| {
        Some(value.as_deref().and_then(length_to_inches).unwrap_or(0.0))
    };

    PrintToPdfParams {
        landscape: options.landscape,
        display_header_footer: options.display_header_footer,
        print_background: options.print_background,
        scale: options.scale,
        paper_width: paper.map(|(width, _)| width),
        paper_height: paper.map(|(_, height)| height),
        margin_top: side(&margin.top),
        margin_bottom: side(&margin.bottom),
        margin_left: side(&margin.left),
        margin_right: side(&margin.right),
        header_template: options.header_template.clone(),
        footer_template: options.footer_template.clone(),
        prefer_css_page_size: options.prefer_css_page_size,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page_config::Margin;

    #[test]
    fn test_print_params_converts_units() {
        let options = PdfOptions {
            format: Some("letter".to_string()),
            landscape: Some(true),
            margin: Some(Margin {
                top: Some("1in".to_string()),
                left: Some("96px".to_string()),
                ..Default::default()
            }),
            print_background: Some(true),
            ..Default::default()
        };

        let params = print_params(&options);
        assert_eq!(params.paper_width, Some(8.5));
        assert_eq!(params.paper_height, Some(11.0));
        assert_eq!(params.landscape, Some(true));
        assert_eq!(params.margin_top, Some(1.0));
        assert_eq!(params.margin_left, Some(1.0));
        assert_eq!(params.margin_right, Some(0.0));
        assert_eq!(params.margin_bottom, Some(0.0));
        assert_eq!(params.print_background, Some(true));
    }

    #[test]
    fn test_print_params_missing_margins_are_zero() {
        let params = print_params(&PdfOptions {
            margin: Some(Margin {
                top: Some("1in".to_string()),
                bottom: Some("1in".to_string()),
                left: Some("wide".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(params.margin_top, Some(1.0));
        assert_eq!(params.margin_left, Some(0.0));
        assert_eq!(params.margin_right, Some(0.0));

        let params = print_params(&PdfOptions::default());
        assert_eq!(params.margin_top, Some(0.0));
        assert_eq!(params.margin_left, Some(0.0));
    }

    #[test]
    fn test_print_params_unknown_format() {
        let options = PdfOptions {
            format: Some("B7".to_string()),
            ..Default::default()
        };
        let params = print_params(&options);
        assert_eq!(params.paper_width, None);
        assert_eq!(params.paper_height, None);
    }
}
