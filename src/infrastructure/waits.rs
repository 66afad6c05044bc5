//! 页面等待 - 基础设施层
//!
//! 所有等待都是"轮询 JS 条件 + 超时"，是否致命由调用方决定。

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::error::{ExportError, Result};
use crate::infrastructure::render::RenderContext;

/// 文档加载状态和累计资源数
///
/// 资源计时缓冲区默认只有 250 条，写满后不再增长。这里每次读取后清空缓冲区，
/// 累计数记在页面上，保证资源数一直单调增长。
pub const NETWORK_STATE_SCRIPT: &str = r#"(() => {
    const state = window.__pdfExportNetwork || (window.__pdfExportNetwork = { seen: 0 });
    performance.setResourceTimingBufferSize(10000);
    state.seen += performance.getEntriesByType('resource').length;
    performance.clearResourceTimings();
    return { ready: document.readyState !== 'loading', resources: state.seen };
})()"#;

/// 站点的加载指示器消失，且图表已渲染
pub const DYNAMIC_CONTENT_SCRIPT: &str = r#"(() => {
    if (document.querySelectorAll('observablehq-loading').length > 0) return false;
    const svgs = document.querySelectorAll('svg');
    if (svgs.length === 0) {
        const cells = document.querySelectorAll('[id^="cell-"]');
        return Array.from(cells).every(cell => cell.children.length > 0);
    }
    return Array.from(svgs).every(svg => svg.children.length > 0);
})()"#;

pub const SVGS_RENDERED_SCRIPT: &str = r#"(() => Array.from(document.querySelectorAll('svg'))
    .every(svg => svg.children.length > 0 || svg.hasAttribute('data-rendered')))()"#;

pub const IMAGES_COMPLETE_SCRIPT: &str =
    r#"(() => Array.from(document.querySelectorAll('img')).every(img => img.complete))()"#;

pub const SVG_COUNT_SCRIPT: &str = "document.querySelectorAll('svg').length";

/// 等待参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeouts {
    /// 动态内容（图表）渲染
    pub dynamic_content: Duration,
    /// `waitForSVGs`
    pub svgs: Duration,
    /// `waitForImages`
    pub images: Duration,
    /// 多久没有新资源算网络空闲
    pub network_quiet: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
}

impl Default for WaitTimeouts {
    fn default() -> Self {
        Self {
            dynamic_content: Duration::from_millis(30_000),
            svgs: Duration::from_millis(10_000),
            images: Duration::from_millis(10_000),
            network_quiet: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// 执行 JS 并反序列化结果
pub async fn eval_as<C: RenderContext, T: DeserializeOwned>(page: &C, script: &str) -> Result<T> {
    let value = page.evaluate(script).await?;
    Ok(serde_json::from_value(value)?)
}

/// 轮询直到 `script` 返回 `true`
///
/// # 返回
/// 超时返回 `ExportError::Timeout`
pub async fn wait_for_condition<C: RenderContext>(
    page: &C,
    what: &str,
    script: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if eval_as::<C, bool>(page, script).await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(ExportError::timeout(what, timeout.as_millis() as u64));
        }
        sleep(poll_interval).await;
    }
}

#[derive(Debug, Deserialize)]
struct NetworkState {
    ready: bool,
    resources: u64,
}

/// 等待文档解析完成且网络空闲（`quiet` 时间内没有新的资源请求）
///
/// 本身不设上限，由调用方用导航超时包住。
pub async fn wait_for_network_idle<C: RenderContext>(
    page: &C,
    quiet: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let mut last_resources = None;
    let mut quiet_since = Instant::now();

    loop {
        let state: NetworkState = eval_as(page, NETWORK_STATE_SCRIPT).await?;
        if !state.ready || last_resources != Some(state.resources) {
            last_resources = Some(state.resources);
            quiet_since = Instant::now();
        } else if quiet_since.elapsed() >= quiet {
            return Ok(());
        }
        sleep(poll_interval).await;
    }
}
