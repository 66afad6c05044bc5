//! 渲染引擎抽象 - 基础设施层
//!
//! 编排层和流程层只依赖这两个 trait：
//! - `RenderEngine`：整个批次共享一个，启动昂贵，负责创建渲染上下文
//! - `RenderContext`：一个文档一个，用完即关
//!
//! 生产环境由 chromiumoxide 实现，测试中可以换成内存实现。

use serde_json::Value as JsonValue;
use std::future::Future;

use crate::error::Result;
use crate::models::page_config::PdfOptions;

/// 视口（只影响初始布局，不决定纸张大小）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1200,
    height: 800,
    device_scale_factor: 2.0,
};

/// 共享渲染引擎
pub trait RenderEngine: Send + Sync + 'static {
    type Context: RenderContext + 'static;

    /// 创建一个隔离的渲染上下文
    fn new_context(&self) -> impl Future<Output = Result<Self::Context>> + Send;

    /// 关闭引擎
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

/// 单个文档的渲染上下文
pub trait RenderContext: Send + Sync {
    fn set_viewport(&self, viewport: Viewport) -> impl Future<Output = Result<()>> + Send;

    /// 打开地址，等待 load 事件
    fn navigate(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// 在页面中执行 JS 表达式
    fn evaluate(&self, script: &str) -> impl Future<Output = Result<JsonValue>> + Send;

    /// 当前 DOM 的 HTML
    fn content(&self) -> impl Future<Output = Result<String>> + Send;

    /// 用新的 HTML 替换当前文档（保留文档地址）
    fn set_content(&self, html: &str) -> impl Future<Output = Result<()>> + Send;

    /// 导出 PDF
    fn print_pdf(&self, options: &PdfOptions) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// 关闭上下文
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}
