//! 封面页 - 业务能力层

use regex::Regex;

use crate::error::{ExportError, Result};
use crate::models::export_config::CoverPageConfig;
use crate::models::html_document::{parse_element, HtmlDocument};

/// 没有 h1 时的封面标题
pub const FALLBACK_TITLE: &str = "Document";

/// 从第一个 h1 提取封面标题，去掉配置的前缀（大小写不敏感）
pub fn cover_title(heading: Option<&str>, prefix: &str) -> String {
    let Some(heading) = heading else {
        return FALLBACK_TITLE.to_string();
    };
    let heading = heading.trim();
    if prefix.is_empty() {
        return heading.to_string();
    }

    let pattern = format!(r"(?i)^{}\s*", regex::escape(prefix));
    match Regex::new(&pattern) {
        Ok(re) => re.replace(heading, "").trim().to_string(),
        Err(_) => heading.to_string(),
    }
}

/// 在主内容容器最前面插入封面
///
/// # 返回
/// 插入成功返回 `true`；没有主容器或容器为空时不插入，返回 `false`
pub fn inject_cover_page(
    document: &HtmlDocument,
    config: &CoverPageConfig,
    date: &str,
) -> Result<bool> {
    let Some(main) = document.main_container() else {
        return Ok(false);
    };
    if main.first_child().is_none() {
        return Ok(false);
    }

    let first_heading = document.select_first("h1").map(|h1| h1.text_contents());
    let title = cover_title(first_heading.as_deref(), &config.title_prefix);

    let hero = parse_element(r#"<div class="hero"><h1></h1></div>"#, "div")
        .ok_or_else(|| ExportError::render("无法创建封面元素"))?;
    let heading = hero
        .select_first("h1")
        .map_err(|_| ExportError::Selector("h1".into()))?;
    heading.as_node().append(kuchikiki::NodeRef::new_text(title));

    if let Some(subtitle) = config.subtitle.as_deref().filter(|s| !s.is_empty()) {
        hero.append(text_paragraph("subtitle", subtitle)?);
    }
    hero.append(text_paragraph("date", date)?);

    main.prepend(hero);
    Ok(true)
}

fn text_paragraph(class: &str, text: &str) -> Result<kuchikiki::NodeRef> {
    let paragraph = parse_element(&format!(r#"<p class="{}"></p>"#, class), "p")
        .ok_or_else(|| ExportError::render("无法创建封面段落"))?;
    paragraph.append(kuchikiki::NodeRef::new_text(text));
    Ok(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_title_strips_prefix_case_insensitive() {
        let prefix = "Inception Report:";
        assert_eq!(
            cover_title(Some("Inception Report: Critical Minerals"), prefix),
            "Critical Minerals"
        );
        assert_eq!(
            cover_title(Some("INCEPTION REPORT:   Trade"), prefix),
            "Trade"
        );
        assert_eq!(cover_title(Some("Annual Review"), prefix), "Annual Review");
        assert_eq!(cover_title(None, prefix), FALLBACK_TITLE);
        assert_eq!(cover_title(Some(" Title "), ""), "Title");
    }

    #[test]
    fn test_cover_title_prefix_is_literal() {
        assert_eq!(cover_title(Some("a.b Title"), "a.b"), "Title");
        assert_eq!(cover_title(Some("axb Title"), "a.b"), "axb Title");
    }

    #[test]
    fn test_inject_cover_page() {
        let document = HtmlDocument::parse(
            "<html><body><main id=\"main-content\"><h1>Inception Report: Minerals</h1><p>Body</p></main></body></html>",
        );
        let config = CoverPageConfig {
            subtitle: Some("A <short> analysis".to_string()),
            ..Default::default()
        };

        assert!(inject_cover_page(&document, &config, "October 16, 2026").unwrap());

        let main = document.main_container().unwrap();
        let first = main.first_child().unwrap();
        let hero = first.as_element().unwrap();
        assert_eq!(hero.attributes.borrow().get("class"), Some("hero"));

        assert_eq!(document.count(".hero h1").unwrap(), 1);
        let html = document.to_html();
        assert!(html.contains("<div class=\"hero\"><h1>Minerals</h1>"));
        assert!(html.contains("<p class=\"subtitle\">A &lt;short&gt; analysis</p>"));
        assert!(html.contains("<p class=\"date\">October 16, 2026</p>"));
    }

    #[test]
    fn test_inject_cover_page_without_main() {
        let document = HtmlDocument::parse("<html><body><p>No main</p></body></html>");
        assert!(!inject_cover_page(&document, &CoverPageConfig::default(), "today").unwrap());
        assert_eq!(document.count(".hero").unwrap(), 0);
    }

    #[test]
    fn test_inject_cover_page_empty_main() {
        let document = HtmlDocument::parse("<html><body><main></main></body></html>");
        assert!(!inject_cover_page(&document, &CoverPageConfig::default(), "today").unwrap());
    }
}
