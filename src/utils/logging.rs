/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::models::outcome::BatchStats;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则详细模式为 debug，安静模式为 warn，默认 info。
/// 重复调用不会报错（测试中每个用例都可能初始化一次）。
pub fn init(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(settings: &Settings) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 站点 PDF 导出");
    info!("📁 输入目录: {}", settings.input_dir.display());
    info!("📂 输出目录: {}", settings.output_dir.display());
    info!("📊 并发数: {}", settings.concurrency());
    info!("{}", "=".repeat(60));
}

/// 记录文档扫描结果
///
/// # 参数
/// - `total`: 文档总数
/// - `concurrency`: 并发数
pub fn log_documents_found(total: usize, concurrency: usize) {
    info!("✓ 找到 {} 个待转换的文档", total);
    if concurrency > 1 {
        info!("📋 将以每批 {} 个的方式处理", concurrency);
        info!("💡 每批完成后再开始下一批\n");
    }
}

/// 记录批次开始信息
///
/// # 参数
/// - `chunk_num`: 批次编号
/// - `total_chunks`: 批次总数
/// - `start`: 起始文档编号
/// - `end`: 结束文档编号
/// - `total`: 文档总数
pub fn log_chunk_start(chunk_num: usize, total_chunks: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", chunk_num, total_chunks);
    info!("📄 本批文档: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_chunk_complete(chunk_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", chunk_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 顺序处理时的进度：`[i/n] pct%`
pub fn log_progress(index: usize, total: usize, percent: usize, name: &str) {
    info!("[{}/{}] {}% {}", index, total, percent, name);
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &BatchStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.successful, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("⏱️ 耗时: {}", format_duration(stats.elapsed()));
    for (path, reason) in &stats.failures {
        error!("  - {}: {}", path.display(), truncate_text(reason, 120));
    }
    info!("{}", "=".repeat(60));
}

/// 文件大小，例如 `1.5 MB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// 耗时，例如 `850ms`、`12.3s`、`2m 05s`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
