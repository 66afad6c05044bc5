//! 页面清理 - 业务能力层
//!
//! 去掉站点原有样式和导航外壳，只留下正文结构，之后再注入打印样式。

use tracing::debug;

use crate::error::Result;
use crate::models::html_document::{replace_children_with_text, tag_name, HtmlDocument};

/// 站点生成器的命名空间
pub const SITE_NAMESPACE: &str = "observablehq";

/// 需要删除的站点外壳
pub const CHROME_SELECTORS: &[&str] = &[
    ".observablehq-header",
    ".observablehq-footer",
    "#observablehq-footer",
    ".observablehq-sidebar",
    ".observablehq-sidebar-toggle",
    ".observablehq-toc",
    ".observablehq-toc-toggle",
    ".observablehq-search",
    ".observablehq-theme-toggle",
    ".observablehq-pager",
    "#observablehq-sidebar-toggle",
    "#observablehq-toc-toggle",
    "#observablehq-sidebar",
    "#observablehq-toc",
    "#observablehq-center > aside",
    "nav#observablehq-sidebar",
    "aside#observablehq-toc",
    "label[for=\"observablehq-sidebar-toggle\"]",
    "footer",
];

/// 标题中的自链接锚点
pub const HEADER_ANCHOR_SELECTOR: &str = ".observablehq-header-anchor";

pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// 清理后主内容容器的 id
pub const MAIN_CONTENT_ID: &str = "main-content";

/// 清理统计（只用于日志）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    pub stylesheets_removed: usize,
    pub chrome_removed: usize,
    pub headings_unlinked: usize,
    pub classes_stripped: usize,
}

/// 清理页面
///
/// 顺序固定：样式表 → 内联样式 → 站点外壳 → 标题锚点 → 命名空间类名 → 主容器 → 标题可见性
pub fn sanitize(document: &HtmlDocument) -> Result<SanitizeReport> {
    let mut report = SanitizeReport::default();

    // 原有样式（脚本一并删除：快照已包含渲染结果，写回时不能再执行一次）
    report.stylesheets_removed += document.remove_all("link[rel=\"stylesheet\"]")?;
    report.stylesheets_removed += document.remove_all("style")?;
    document.remove_all("script")?;

    for element in document.select("[style]")? {
        element.attributes.borrow_mut().remove("style");
    }

    for selector in CHROME_SELECTORS {
        report.chrome_removed += document.remove_all(selector)?;
    }

    report.headings_unlinked = unlink_headings(document)?;
    report.classes_stripped = strip_namespace_classes(document)?;

    if let Some(main) = document.select_first("main, #observablehq-main") {
        if let Some(element) = main.as_element() {
            let mut attributes = element.attributes.borrow_mut();
            attributes.insert("id", MAIN_CONTENT_ID.to_string());
            attributes.remove("class");
        }
    }

    for heading in document.select(HEADING_SELECTOR)? {
        heading.attributes.borrow_mut().insert(
            "style",
            "display: block; visibility: visible; opacity: 1;".to_string(),
        );
    }

    debug!("页面清理完成: {:?}", report);
    Ok(report)
}

/// 标题内的自链接锚点替换为纯文本
fn unlink_headings(document: &HtmlDocument) -> Result<usize> {
    let mut unlinked = 0;
    for anchor in document.select(HEADER_ANCHOR_SELECTOR)? {
        let Some(heading) = anchor.as_node().parent() else {
            continue;
        };
        let is_heading = tag_name(&heading)
            .map(|name| matches!(name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
            .unwrap_or(false);
        if is_heading {
            let text = anchor.as_node().text_contents();
            replace_children_with_text(&heading, &text);
            unlinked += 1;
        }
    }
    Ok(unlinked)
}

/// 去掉类名中带命名空间的部分，元素本身保留
fn strip_namespace_classes(document: &HtmlDocument) -> Result<usize> {
    let mut stripped = 0;
    for element in document.select(&format!("[class*=\"{}\"]", SITE_NAMESPACE))? {
        let mut attributes = element.attributes.borrow_mut();
        let Some(classes) = attributes.get("class").map(str::to_string) else {
            continue;
        };
        let kept: Vec<&str> = classes
            .split_whitespace()
            .filter(|class| !class.contains(SITE_NAMESPACE))
            .collect();
        stripped += classes.split_whitespace().count() - kept.len();

        if kept.is_empty() {
            attributes.remove("class");
        } else {
            attributes.insert("class", kept.join(" "));
        }
    }
    Ok(stripped)
}
