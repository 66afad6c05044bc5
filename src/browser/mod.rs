//! 浏览器资源
//!
//! 两种获取方式：
//! - `headless`：启动一个新的无头浏览器（默认）
//! - `connection`：连接到已经开启远程调试端口的浏览器
//!
//! 两种方式都得到 `ChromiumEngine`，每个文档一个新标签页。

pub mod connection;
pub mod headless;

use chromiumoxide::{Browser, Handler};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::infrastructure::render::RenderEngine;
use crate::infrastructure::JsExecutor;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 基于 chromiumoxide 的渲染引擎
pub struct ChromiumEngine {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    /// 是否由本进程启动（连接的浏览器只断开，不关闭）
    owned: bool,
}

impl ChromiumEngine {
    fn new(browser: Browser, handler: Handler, owned: bool) -> Self {
        Self {
            browser: Mutex::new(browser),
            handler: spawn_handler(handler),
            owned,
        }
    }
}

/// 在后台处理浏览器事件
///
/// 单个事件出错不影响其他页面，记录后继续。
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("浏览器事件错误: {}", e);
            }
        }
    })
}

impl RenderEngine for ChromiumEngine {
    type Context = JsExecutor;

    async fn new_context(&self) -> Result<JsExecutor> {
        let page = self.browser.lock().await.new_page("about:blank").await?;
        Ok(JsExecutor::new(page))
    }

    async fn close(&self) -> Result<()> {
        if self.owned {
            let mut browser = self.browser.lock().await;
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                warn!("⚠️ 等待浏览器进程退出失败: {}", e);
            }
            info!("✓ 浏览器已关闭");
        } else {
            info!("✓ 已断开浏览器连接");
        }
        self.handler.abort();
        Ok(())
    }
}

impl Drop for ChromiumEngine {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

pub(crate) fn engine_error(action: &str, e: impl std::fmt::Display) -> ExportError {
    ExportError::Engine(format!("{}: {}", action, e))
}
