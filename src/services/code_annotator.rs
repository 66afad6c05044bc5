//! 二维码服务 - 业务能力层
//!
//! 只负责"生成二维码并放进页面"能力，不关心流程

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{Color, QrCode};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::models::html_document::{parse_element, HtmlDocument};
use crate::models::qr_config::{QrOptions, QrPosition};

/// 页面中二维码容器的类名
pub const CONTAINER_CLASS: &str = "qr-code-container";

/// 生成好的二维码
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// `data:image/svg+xml;base64,...`
    pub data_url: String,
    /// 二维码指向的地址
    pub target_url: String,
    pub position: QrPosition,
}

/// 生成二维码
///
/// # 参数
/// - `document_path`: 当前文档（只用于日志）
/// - `options`: 已按文档类型合并的二维码参数
///
/// # 返回
/// 没有配置 `baseUrl` 时返回 `Ok(None)`；所有文档都指向同一个 `baseUrl`。
pub fn generate(document_path: &Path, options: &QrOptions) -> Result<Option<Annotation>> {
    let Some(target_url) = options.base_url.as_deref().filter(|url| !url.is_empty()) else {
        debug!("未配置 baseUrl，跳过二维码: {}", document_path.display());
        return Ok(None);
    };

    let code = QrCode::with_error_correction_level(target_url, options.ec_level().into())?;
    let svg = render_svg(&code, options);
    let data_url = format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()));

    debug!(
        "二维码已生成: {} -> {} ({} 模块)",
        document_path.display(),
        target_url,
        code.width()
    );

    Ok(Some(Annotation {
        data_url,
        target_url: target_url.to_string(),
        position: options.position.clone().unwrap_or_default(),
    }))
}

/// 把二维码矩阵画成 SVG
///
/// 坐标以模块为单位，`margin` 为四周静区模块数，图片宽高为 `width` 像素。
fn render_svg(code: &QrCode, options: &QrOptions) -> String {
    let modules = code.width();
    let margin = options.margin_modules() as usize;
    let size = modules + margin * 2;
    let colors = code.to_colors();

    let mut path = String::new();
    for y in 0..modules {
        for x in 0..modules {
            if colors[y * modules + x] == Color::Dark {
                let _ = write!(path, "M{} {}h1v1h-1z", x + margin, y + margin);
            }
        }
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{width}" "#,
            r#"viewBox="0 0 {size} {size}" shape-rendering="crispEdges">"#,
            r#"<path fill="{light}" d="M0 0h{size}v{size}H0z"/>"#,
            r#"<path fill="{dark}" d="{path}"/></svg>"#
        ),
        width = options.width_px(),
        size = size,
        light = options.light_color(),
        dark = options.dark_color(),
        path = path,
    )
}

impl Annotation {
    /// 注入到页面
    ///
    /// 先删除已有的二维码，再追加到主内容容器（没有时追加到 body），重复调用结果不变。
    pub fn inject(&self, document: &HtmlDocument) -> Result<()> {
        document.remove_all(&format!(".{}", CONTAINER_CLASS))?;

        let container = parse_element(
            &format!(
                r#"<div class="{} qr-code-first-page {}"><a target="_blank" rel="noopener noreferrer"><img class="qr-code-image"></a></div>"#,
                CONTAINER_CLASS,
                self.position.class_name()
            ),
            "div",
        )
        .ok_or_else(|| ExportError::render("无法创建二维码容器"))?;

        for link in container.select("a").map_err(|_| ExportError::Selector("a".into()))? {
            link.attributes
                .borrow_mut()
                .insert("href", self.target_url.clone());
        }
        for image in container
            .select("img")
            .map_err(|_| ExportError::Selector("img".into()))?
        {
            let mut attributes = image.attributes.borrow_mut();
            attributes.insert("src", self.data_url.clone());
            attributes.insert("alt", self.position.title_text().to_string());
        }

        let target = document
            .main_container()
            .or_else(|| document.body())
            .ok_or_else(|| ExportError::render("页面中没有可注入二维码的位置"))?;
        target.append(container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::qr_config::QrColors;

    fn options() -> QrOptions {
        QrOptions {
            base_url: Some("https://example.org/".to_string()),
            ..Default::default()
        }
    }

    fn decode_svg(annotation: &Annotation) -> String {
        let payload = annotation
            .data_url
            .strip_prefix("data:image/svg+xml;base64,")
            .unwrap();
        String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn test_generate_without_base_url_is_none() {
        let result = generate(Path::new("/dist/a.html"), &QrOptions::default()).unwrap();
        assert!(result.is_none());

        let empty = QrOptions {
            base_url: Some(String::new()),
            ..Default::default()
        };
        assert!(generate(Path::new("/dist/a.html"), &empty).unwrap().is_none());
    }

    #[test]
    fn test_generate_targets_base_url_for_every_document() {
        let a = generate(Path::new("/dist/a.html"), &options()).unwrap().unwrap();
        let b = generate(Path::new("/dist/deep/b.html"), &options()).unwrap().unwrap();

        assert_eq!(a.target_url, "https://example.org/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_svg_uses_configured_look() {
        let custom = QrOptions {
            width: Some(120),
            colors: Some(QrColors {
                dark: Some("#111111".to_string()),
                light: None,
            }),
            ..options()
        };
        let annotation = generate(Path::new("/dist/a.html"), &custom).unwrap().unwrap();
        let svg = decode_svg(&annotation);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="120""#));
        assert!(svg.contains(r##"fill="#111111""##));
        assert!(svg.contains(r##"fill="#ffffff""##));
        // 两侧各 1 模块静区
        let modules = QrCode::new("https://example.org/").unwrap().width() + 2;
        assert!(svg.contains(&format!(r#"viewBox="0 0 {modules} {modules}""#)));
    }

    #[test]
    fn test_inject_prefers_main_and_is_idempotent() {
        let document = HtmlDocument::parse(
            "<html><body><main><h1>Title</h1></main><p>outside</p></body></html>",
        );
        let annotation = generate(Path::new("/dist/a.html"), &options()).unwrap().unwrap();

        annotation.inject(&document).unwrap();
        annotation.inject(&document).unwrap();

        assert_eq!(document.count(".qr-code-container").unwrap(), 1);
        assert_eq!(document.count("main > .qr-code-container").unwrap(), 1);

        let html = document.to_html();
        assert!(html.contains(r#"class="qr-code-container qr-code-first-page qr-code-top-right""#));
        assert!(html.contains(r#"href="https://example.org/""#));
        assert!(html.contains(r#"alt="Scan to view online""#));
    }

    #[test]
    fn test_inject_falls_back_to_body() {
        let document = HtmlDocument::parse("<html><body><div>content</div></body></html>");
        let annotation = generate(Path::new("/dist/a.html"), &options()).unwrap().unwrap();

        annotation.inject(&document).unwrap();
        assert_eq!(document.count("body > .qr-code-container").unwrap(), 1);
    }
}
