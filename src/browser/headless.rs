use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::{engine_error, ChromiumEngine};
use crate::error::Result;

/// 启动参数：容器内无沙盒，允许 file:// 页面加载本地资源，字体不做 hinting
const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-web-security",
    "--font-render-hinting=none",
];

/// 启动无头浏览器
///
/// # 参数
/// - `executable`: 浏览器可执行文件，`None` 时自动查找
pub async fn launch_headless_browser(executable: Option<&Path>) -> Result<ChromiumEngine> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .args(LAUNCH_ARGS.to_vec());
    if let Some(path) = executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        engine_error("配置无头浏览器失败", e)
    })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        engine_error("启动无头浏览器失败", e)
    })?;
    let engine = ChromiumEngine::new(browser, handler, true);

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    info!("✅ 无头浏览器已启动");
    Ok(engine)
}
