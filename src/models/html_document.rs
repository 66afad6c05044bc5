//! 内存中的 HTML 文档模型
//!
//! 页面快照在这里被解析、修改，再序列化写回浏览器。
//! `NodeRef` 不是 `Send`，所以文档对象只能在同步代码中使用，不能跨 `.await` 持有。

use kuchikiki::traits::TendrilSink;
use kuchikiki::{ElementData, NodeDataRef, NodeRef};

use crate::error::{ExportError, Result};

/// 主内容容器的选择器（按文档顺序取第一个）
pub const MAIN_CONTAINER_SELECTOR: &str =
    "main, #main-content, #observablehq-main, .observablehq-main, .observablehq";

/// HTML 文档
pub struct HtmlDocument {
    root: NodeRef,
}

impl HtmlDocument {
    /// 解析完整的 HTML 文档
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchikiki::parse_html().one(html),
        }
    }

    /// 选择所有匹配的元素
    ///
    /// 结果先收集再返回，调用方可以安全地在遍历时删除节点。
    pub fn select(&self, selector: &str) -> Result<Vec<NodeDataRef<ElementData>>> {
        self.root
            .select(selector)
            .map(|matches| matches.collect())
            .map_err(|_| ExportError::Selector(selector.to_string()))
    }

    /// 第一个匹配的节点
    pub fn select_first(&self, selector: &str) -> Option<NodeRef> {
        self.root
            .select_first(selector)
            .ok()
            .map(|element| element.as_node().clone())
    }

    /// 匹配的元素数量
    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.select(selector)?.len())
    }

    /// 删除所有匹配的元素，返回删除数量
    pub fn remove_all(&self, selector: &str) -> Result<usize> {
        let matches = self.select(selector)?;
        for element in &matches {
            element.as_node().detach();
        }
        Ok(matches.len())
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.select_first("head")
    }

    pub fn body(&self) -> Option<NodeRef> {
        self.select_first("body")
    }

    /// 主内容容器
    pub fn main_container(&self) -> Option<NodeRef> {
        self.select_first(MAIN_CONTAINER_SELECTOR)
    }

    /// 追加一个 `<style>` 元素到 `<head>`
    pub fn append_style(&self, css: &str) -> Result<()> {
        let style = parse_element("<style></style>", "style")
            .ok_or_else(|| ExportError::render("无法创建 style 元素"))?;
        style.append(NodeRef::new_text(css));

        let parent = self
            .head()
            .or_else(|| self.body())
            .unwrap_or_else(|| self.root.clone());
        parent.append(style);
        Ok(())
    }

    /// 序列化为 HTML
    pub fn to_html(&self) -> String {
        self.root.to_string()
    }
}

/// 解析一段 HTML，取出第一个匹配 `selector` 的元素（已脱离临时文档）
pub fn parse_element(html: &str, selector: &str) -> Option<NodeRef> {
    let scratch = kuchikiki::parse_html().one(html);
    let element = scratch.select_first(selector).ok()?.as_node().clone();
    element.detach();
    Some(element)
}

/// 用纯文本替换节点的全部子节点
pub fn replace_children_with_text(node: &NodeRef, text: &str) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// 元素标签名
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>t</title></head>
<body>
  <nav id="observablehq-sidebar">nav</nav>
  <div id="observablehq-center">
    <main id="observablehq-main" class="observablehq"><h1>Hello</h1><p>Body</p></main>
  </div>
</body></html>"#;

    #[test]
    fn test_remove_all_counts_and_detaches() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.remove_all("#observablehq-sidebar").unwrap(), 1);
        assert_eq!(doc.count("nav").unwrap(), 0);
        assert_eq!(doc.remove_all(".missing").unwrap(), 0);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let doc = HtmlDocument::parse(PAGE);
        assert!(matches!(doc.select("[[["), Err(ExportError::Selector(_))));
    }

    #[test]
    fn test_main_container() {
        let doc = HtmlDocument::parse(PAGE);
        let main = doc.main_container().unwrap();
        assert_eq!(tag_name(&main).as_deref(), Some("main"));
    }

    #[test]
    fn test_append_style_goes_to_head() {
        let doc = HtmlDocument::parse(PAGE);
        doc.append_style("h1 { color: red; }").unwrap();

        let html = doc.to_html();
        assert!(html.contains("<style>h1 { color: red; }</style></head>"));
    }

    #[test]
    fn test_replace_children_with_text() {
        let doc = HtmlDocument::parse("<h2><a href=\"#x\">Title <b>bold</b></a></h2>");
        let heading = doc.select_first("h2").unwrap();
        replace_children_with_text(&heading, "Plain & simple");
        assert!(doc.to_html().contains("<h2>Plain &amp; simple</h2>"));
    }

    #[test]
    fn test_parse_element() {
        let div = parse_element("<div class=\"hero\"><h1></h1></div>", "div").unwrap();
        assert!(div.parent().is_none());
        assert_eq!(tag_name(&div).as_deref(), Some("div"));
    }
}
