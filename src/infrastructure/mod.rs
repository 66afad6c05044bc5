//! 基础设施层
//!
//! 持有稀缺资源（浏览器页面），只暴露能力，不认识业务

pub mod js_executor;
pub mod render;
pub mod waits;

pub use js_executor::JsExecutor;
pub use render::{RenderContext, RenderEngine, Viewport, DEFAULT_VIEWPORT};
pub use waits::WaitTimeouts;
