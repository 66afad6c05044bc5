//! 文档转换流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整转换流程
//!
//! 流程顺序：
//! 1. 设置视口 → 打开页面 → 等待网络空闲（超时即失败）
//! 2. 在原页面上等待动态内容和 SVG（页面脚本还在运行）
//! 3. 取 DOM 快照 → 清理 → 封面 → 样式 → 二维码（纯内存操作）
//! 4. 写回页面 → 等待图片和额外时间
//! 5. 导出 PDF 并写入文件（失败即失败）
//!
//! 第 2 到 4 步中的任何问题都降级为警告，流程继续。

use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::infrastructure::render::{RenderContext, DEFAULT_VIEWPORT};
use crate::infrastructure::waits::{
    self, WaitTimeouts, DYNAMIC_CONTENT_SCRIPT, IMAGES_COMPLETE_SCRIPT, SVGS_RENDERED_SCRIPT,
    SVG_COUNT_SCRIPT,
};
use crate::models::document::{DocumentDescriptor, DocumentType};
use crate::models::export_config::{CoverPageConfig, ExportConfig, WaitConditions};
use crate::models::html_document::HtmlDocument;
use crate::models::page_config::PageConfig;
use crate::models::qr_config::QrOptions;
use crate::services::cover_page::inject_cover_page;
use crate::services::style_resolver::{format_render_date, render_date_rule};
use crate::services::{code_annotator, generate_page_styles, map_path, sanitize, StyleResolver};
use crate::workflow::document_ctx::DocumentCtx;

/// 导出成功的文档
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub output_path: PathBuf,
    pub bytes: u64,
    /// 非致命问题
    pub warnings: Vec<String>,
}

/// 文档转换流程
///
/// - 编排单个文档的完整转换流程
/// - 不持有渲染上下文，由调用方传入并负责关闭
/// - 整个批次共享一个（样式表缓存在这里）
pub struct DocumentFlow {
    config: Arc<ExportConfig>,
    styles: StyleResolver,
    input_root: PathBuf,
    output_root: PathBuf,
    timeouts: WaitTimeouts,
}

impl DocumentFlow {
    /// 创建新的文档转换流程
    pub fn new(
        config: Arc<ExportConfig>,
        stylesheet_path: impl Into<PathBuf>,
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        let styles = StyleResolver::new(&config, stylesheet_path);
        Self {
            config,
            styles,
            input_root: input_root.into(),
            output_root: output_root.into(),
            timeouts: WaitTimeouts::default(),
        }
    }

    /// 替换等待参数
    pub fn with_timeouts(mut self, timeouts: WaitTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// 为输入文件创建描述（类型 + 合并后的版式配置）
    pub fn describe(&self, path: PathBuf) -> DocumentDescriptor {
        let page_config = self
            .styles
            .resolve_page_config(DocumentType::from_path(&path));
        DocumentDescriptor::new(path, page_config)
    }

    /// 输出文件路径
    pub fn output_path(&self, input: &Path) -> PathBuf {
        map_path(input, &self.input_root, &self.output_root)
    }

    pub async fn run<C: RenderContext>(&self, page: &C, ctx: &DocumentCtx) -> Result<ExportedDocument> {
        let descriptor = &ctx.descriptor;
        let mut warnings = Vec::new();

        if let Err(e) = page.set_viewport(DEFAULT_VIEWPORT).await {
            soft_failure(ctx, &mut warnings, format!("设置视口失败: {}", e));
        }

        // ========== 1. 打开页面（失败即失败） ==========
        debug!("{} 类型: {}", ctx, descriptor.doc_type);
        self.load_page(page, descriptor).await?;
        debug!("{} ✓ 页面加载完成", ctx);

        // ========== 2. 等待页面渲染完成 ==========
        let conditions = self.config.wait_conditions.clone().unwrap_or_default();
        self.wait_for_rendering(page, ctx, &conditions, &mut warnings).await;

        // ========== 3. 在内存中改写页面 ==========
        match page.content().await {
            Ok(snapshot) => {
                let prepared = self.prepare(ctx, &snapshot).await;
                for warning in prepared.warnings {
                    soft_failure(ctx, &mut warnings, warning);
                }

                // ========== 4. 写回页面，图片会重新加载 ==========
                match page.set_content(&prepared.html).await {
                    Ok(()) => self.wait_after_write_back(page, ctx, &conditions, &mut warnings).await,
                    Err(e) => soft_failure(ctx, &mut warnings, format!("写回页面失败: {}", e)),
                }
            }
            Err(e) => soft_failure(ctx, &mut warnings, format!("读取页面内容失败: {}", e)),
        }

        // ========== 5. 导出 PDF（失败即失败） ==========
        let output_path = self.output_path(&descriptor.path);
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExportError::file(parent, e))?;
        }

        let pdf = page.print_pdf(&descriptor.page_config.pdf_options()).await?;
        tokio::fs::write(&output_path, &pdf)
            .await
            .map_err(|e| ExportError::file(&output_path, e))?;

        info!("{} 📄 已写入: {}", ctx, output_path.display());

        Ok(ExportedDocument {
            output_path,
            bytes: pdf.len() as u64,
            warnings,
        })
    }

    /// 打开页面，等待解析完成和网络空闲，整体受 `timeout` 约束
    async fn load_page<C: RenderContext>(&self, page: &C, descriptor: &DocumentDescriptor) -> Result<()> {
        let timeout_ms = descriptor.page_config.timeout_ms();
        let load = async {
            page.navigate(&descriptor.file_url()).await?;
            waits::wait_for_network_idle(
                page,
                self.timeouts.network_quiet,
                self.timeouts.poll_interval,
            )
            .await
        };

        tokio::time::timeout(Duration::from_millis(timeout_ms), load)
            .await
            .map_err(|_| ExportError::timeout("页面加载", timeout_ms))?
    }

    /// 准备改写所需的输入，再交给纯函数处理
    async fn prepare(&self, ctx: &DocumentCtx, snapshot: &str) -> PreparedDocument {
        let descriptor = &ctx.descriptor;
        let mut warnings = Vec::new();

        let stylesheet = match self.styles.load_styles().await {
            Ok(styles) => Some(styles),
            Err(e) => {
                warnings.push(format!("读取打印样式表失败: {}", e));
                None
            }
        };

        let qr = match &self.config.qr_code {
            Some(qr) if self.config.qr_enabled() => Some(qr.resolve(descriptor.doc_type)),
            _ => None,
        };
        let render_date = format_render_date(Local::now());

        let inputs = PrepareInputs {
            path: &descriptor.path,
            page_config: &descriptor.page_config,
            stylesheet,
            render_date: &render_date,
            cover: &self.config.cover_page,
            qr: qr.as_ref(),
        };

        let mut prepared = prepare_document(snapshot, &inputs);
        warnings.append(&mut prepared.warnings);
        prepared.warnings = warnings;
        prepared
    }

    /// 在原页面上等待动态内容（和 SVG），超时只记警告
    ///
    /// 必须在取快照之前：写回的页面没有脚本，不会再继续渲染。
    async fn wait_for_rendering<C: RenderContext>(
        &self,
        page: &C,
        ctx: &DocumentCtx,
        conditions: &WaitConditions,
        warnings: &mut Vec<String>,
    ) {
        let poll = self.timeouts.poll_interval;

        if let Err(e) = waits::wait_for_condition(
            page,
            "动态内容等待",
            DYNAMIC_CONTENT_SCRIPT,
            self.timeouts.dynamic_content,
            poll,
        )
        .await
        {
            soft_failure(ctx, warnings, e.to_string());
        }

        if conditions.wait_for_svgs {
            if let Err(e) = waits::wait_for_condition(
                page,
                "SVG 渲染等待",
                SVGS_RENDERED_SCRIPT,
                self.timeouts.svgs,
                poll,
            )
            .await
            {
                soft_failure(ctx, warnings, e.to_string());
            }
        }
    }

    /// 写回之后等待图片加载和额外时间，超时只记警告
    async fn wait_after_write_back<C: RenderContext>(
        &self,
        page: &C,
        ctx: &DocumentCtx,
        conditions: &WaitConditions,
        warnings: &mut Vec<String>,
    ) {
        if conditions.wait_for_images {
            if let Err(e) = waits::wait_for_condition(
                page,
                "图片加载等待",
                IMAGES_COMPLETE_SCRIPT,
                self.timeouts.images,
                self.timeouts.poll_interval,
            )
            .await
            {
                soft_failure(ctx, warnings, e.to_string());
            }
        }

        if let Some(ms) = conditions.additional_wait_time.filter(|ms| *ms > 0) {
            debug!("{} 额外等待 {}ms", ctx, ms);
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if let Ok(count) = waits::eval_as::<C, u64>(page, SVG_COUNT_SCRIPT).await {
            debug!("{} 页面包含 {} 个 SVG", ctx, count);
        }
    }
}

fn soft_failure(ctx: &DocumentCtx, warnings: &mut Vec<String>, message: String) {
    warn!("{} ⚠️ {}", ctx, message);
    warnings.push(message);
}

// ========== 纯内存改写 ==========

/// 页面改写的全部输入
pub struct PrepareInputs<'a> {
    pub path: &'a Path,
    pub page_config: &'a PageConfig,
    /// 打印样式表内容，读取失败时为 `None`
    pub stylesheet: Option<&'a str>,
    pub render_date: &'a str,
    pub cover: &'a CoverPageConfig,
    /// 已按文档类型合并的二维码参数，未启用时为 `None`
    pub qr: Option<&'a QrOptions>,
}

/// 改写后的页面
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    pub html: String,
    pub warnings: Vec<String>,
}

/// 改写页面快照：清理 → 封面 → 样式 → 二维码
///
/// 每一步失败都只记一条警告，后续步骤照常执行。
pub fn prepare_document(snapshot: &str, inputs: &PrepareInputs<'_>) -> PreparedDocument {
    let document = HtmlDocument::parse(snapshot);
    let mut warnings = Vec::new();

    if let Err(e) = sanitize(&document) {
        warnings.push(format!("页面清理失败: {}", e));
    }

    if inputs.cover.matches(inputs.path) {
        match inject_cover_page(&document, inputs.cover, inputs.render_date) {
            Ok(true) => debug!("封面已插入: {}", inputs.path.display()),
            Ok(false) => debug!("没有可插入封面的主内容: {}", inputs.path.display()),
            Err(e) => warnings.push(format!("封面生成失败: {}", e)),
        }
    }

    let page_styles = generate_page_styles(inputs.page_config);
    let style_blocks = [
        inputs.stylesheet.unwrap_or_default().to_string(),
        render_date_rule(inputs.render_date),
        page_styles,
    ];
    for css in style_blocks.iter().filter(|css| !css.is_empty()) {
        if let Err(e) = document.append_style(css) {
            warnings.push(format!("样式注入失败: {}", e));
        }
    }

    if let Some(options) = inputs.qr {
        match code_annotator::generate(inputs.path, options) {
            Ok(Some(annotation)) => {
                if let Err(e) = annotation.inject(&document) {
                    warnings.push(format!("二维码注入失败: {}", e));
                }
            }
            Ok(None) => {}
            Err(e) => warnings.push(format!("二维码生成失败: {}", e)),
        }
    }

    PreparedDocument {
        html: document.to_html(),
        warnings,
    }
}
