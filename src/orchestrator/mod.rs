//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、关闭引擎）
//! - 扫描待转换文档（`Vec<DocumentCtx>`）
//! - 控制并发数量（Semaphore + 分批）
//! - 持有共享渲染引擎
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 为文档创建并关闭渲染上下文
//! - 委托 `DocumentFlow` 转换
//! - 把错误归类为失败结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<DocumentCtx>)
//!     ↓
//! document_processor (处理一个文档的资源)
//!     ↓
//! workflow::DocumentFlow (一个文档的转换流程)
//!     ↓
//! services (能力层：清理 / 封面 / 样式 / 二维码 / 路径)
//!     ↓
//! infrastructure (基础设施：RenderContext)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，document_processor 管单个
//! 2. **资源隔离**：只有编排层持有渲染引擎
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use document_processor::process_document;
