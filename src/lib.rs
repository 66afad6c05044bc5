//! # Site PDF Export
//!
//! 把静态站点生成器输出的 HTML 页面批量导出为打印友好的 PDF
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器页面），只暴露能力
//! - `RenderEngine` / `RenderContext` - 渲染引擎抽象，测试中可替换
//! - `JsExecutor` - 唯一的 page owner，基于 chromiumoxide 实现 `RenderContext`
//! - `browser/` - 启动或连接浏览器，得到 `ChromiumEngine`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面的内存 DOM
//! - `sanitizer` - 去掉站点样式和导航外壳
//! - `cover_page` - 插入封面
//! - `style_resolver` - 版式配置合并、@page 规则、打印样式表缓存
//! - `code_annotator` - 二维码生成与注入
//! - `path_mapper` - 输入路径 → 输出路径
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整转换流程
//! - `DocumentCtx` - 上下文封装（序号 + 文档描述）
//! - `DocumentFlow` - 流程编排（加载 → 改写 → 等待 → 导出）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理引擎和并发
//! - `orchestrator/document_processor` - 单个文档处理器，管理渲染上下文
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser, launch_headless_browser, ChromiumEngine};
pub use config::Settings;
pub use error::{ExportError, Result};
pub use infrastructure::{JsExecutor, RenderContext, RenderEngine, Viewport, WaitTimeouts};
pub use models::{BatchStats, ConversionOutcome, DocumentDescriptor, DocumentType, ExportConfig};
pub use orchestrator::{process_document, App};
pub use workflow::{DocumentCtx, DocumentFlow};
