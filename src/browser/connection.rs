use chromiumoxide::Browser;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::{engine_error, ChromiumEngine};
use crate::error::Result;

/// 连接到已开启远程调试的浏览器
///
/// 适合调试：可以在浏览器里直接看到每个文档的标签页。
/// 关闭引擎时只断开连接，不会关闭浏览器。
///
/// # 参数
/// - `port`: 远程调试端口（`--remote-debugging-port`）
pub async fn connect_to_browser(port: u16) -> Result<ChromiumEngine> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        engine_error("连接浏览器失败", e)
    })?;
    debug!("浏览器连接成功");

    let engine = ChromiumEngine::new(browser, handler, false);

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    Ok(engine)
}
