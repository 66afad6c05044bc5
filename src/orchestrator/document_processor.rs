//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一个文档的资源生命周期和结果归类：
//!
//! 1. **资源获取**：从共享引擎创建独立的渲染上下文
//! 2. **流程调度**：委托 `DocumentFlow` 完成转换
//! 3. **资源释放**：无论成功失败都关闭渲染上下文
//! 4. **结果归类**：错误不向上抛出，转换为 `ConversionOutcome::Failure`

use std::time::Instant;
use tracing::{error, info, warn};

use crate::infrastructure::render::{RenderContext, RenderEngine};
use crate::models::outcome::ConversionOutcome;
use crate::utils::logging::{format_bytes, format_duration};
use crate::workflow::{DocumentCtx, DocumentFlow};

/// 处理单个文档
///
/// # 参数
/// - `engine`: 共享渲染引擎
/// - `flow`: 文档转换流程
/// - `ctx`: 文档上下文
///
/// # 返回
/// 总是返回结果，失败也是结果
pub async fn process_document<E: RenderEngine>(
    engine: &E,
    flow: &DocumentFlow,
    ctx: &DocumentCtx,
) -> ConversionOutcome {
    let started = Instant::now();
    info!("{} 开始转换", ctx);

    let page = match engine.new_context().await {
        Ok(page) => page,
        Err(e) => {
            error!("{} ❌ 创建页面失败: {}", ctx, e);
            return ConversionOutcome::Failure {
                error: e.to_string(),
            };
        }
    };

    let result = flow.run(&page, ctx).await;

    if let Err(e) = page.close().await {
        warn!("{} ⚠️ 关闭页面失败: {}", ctx, e);
    }

    match result {
        Ok(exported) => {
            let duration = started.elapsed();
            info!(
                "{} ✅ 转换完成 ({}, {}{})",
                ctx,
                format_bytes(exported.bytes),
                format_duration(duration),
                if exported.warnings.is_empty() {
                    String::new()
                } else {
                    format!(", {} 条警告", exported.warnings.len())
                }
            );
            ConversionOutcome::Success {
                output_path: exported.output_path,
                bytes: exported.bytes,
                duration,
                warnings: exported.warnings,
            }
        }
        Err(e) => {
            if e.is_timeout() {
                error!("{} ⏱️ 页面加载超时，跳过: {}", ctx, e);
            } else {
                error!("{} ❌ 转换失败: {}", ctx, e);
            }
            ConversionOutcome::Failure {
                error: e.to_string(),
            }
        }
    }
}
