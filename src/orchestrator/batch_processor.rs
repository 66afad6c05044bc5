//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载配置、启动（或连接）浏览器
//! 2. **文档扫描**：递归查找输入目录下的 HTML 文件，去掉排除项
//! 3. **并发控制**：并发数为 1 时顺序处理；否则分批，批内并发，批间串行
//! 4. **资源管理**：持有共享渲染引擎，任何退出路径都只关闭一次
//! 5. **全局统计**：汇总所有文档的转换结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **资源所有者**：唯一持有渲染引擎的模块
//! - **失败隔离**：单个文档的错误（包括任务崩溃）只计入失败数
//! - **向下委托**：委托 document_processor 处理单个文档

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::browser::{self, ChromiumEngine};
use crate::config::Settings;
use crate::infrastructure::render::RenderEngine;
use crate::infrastructure::waits::WaitTimeouts;
use crate::models::export_config::ExportConfig;
use crate::models::loaders::discover_html_files;
use crate::models::outcome::{BatchStats, ConversionOutcome};
use crate::orchestrator::document_processor::process_document;
use crate::utils::logging::{
    log_chunk_complete, log_chunk_start, log_documents_found, log_progress, log_startup,
    print_final_stats,
};
use crate::workflow::{DocumentCtx, DocumentFlow};

/// 应用主结构
pub struct App<E: RenderEngine = ChromiumEngine> {
    settings: Settings,
    input_root: PathBuf,
    engine: Arc<E>,
    flow: Arc<DocumentFlow>,
    closed: AtomicBool,
}

impl App<ChromiumEngine> {
    /// 初始化应用：加载配置并启动浏览器
    ///
    /// 配置无法读取或浏览器无法启动时返回错误（致命）。
    pub async fn initialize(settings: Settings) -> Result<Self> {
        log_startup(&settings);

        let config = ExportConfig::load(&settings.config_path).await?;
        info!("✓ 配置已加载: {}", settings.config_path.display());

        let engine = match settings.browser_debug_port {
            Some(port) => browser::connect_to_browser(port).await?,
            None => browser::launch_headless_browser(settings.chrome_executable.as_deref()).await?,
        };

        Self::with_engine_or_close(settings, config, engine).await
    }
}

impl<E: RenderEngine> App<E> {
    /// 使用已有的渲染引擎创建应用
    pub fn with_engine(settings: Settings, config: ExportConfig, engine: E) -> Result<Self> {
        Self::build(settings, config, engine).map_err(|(e, _engine)| e)
    }

    /// 同 [`App::with_engine`]，但创建失败时先关闭引擎再返回错误
    pub async fn with_engine_or_close(
        settings: Settings,
        config: ExportConfig,
        engine: E,
    ) -> Result<Self> {
        match Self::build(settings, config, engine) {
            Ok(app) => Ok(app),
            Err((e, engine)) => {
                if let Err(close_err) = engine.close().await {
                    error!("关闭渲染引擎失败: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// 失败时把引擎交还给调用方
    fn build(
        settings: Settings,
        config: ExportConfig,
        engine: E,
    ) -> std::result::Result<Self, (anyhow::Error, E)> {
        let roots = absolute(&settings.input_dir)
            .and_then(|input| Ok((input, absolute(&settings.output_dir)?)));
        let (input_root, output_root) = match roots {
            Ok(roots) => roots,
            Err(e) => return Err((e, engine)),
        };
        let flow = DocumentFlow::new(
            Arc::new(config),
            settings.stylesheet_path.clone(),
            input_root.clone(),
            output_root,
        );

        Ok(Self {
            settings,
            input_root,
            engine: Arc::new(engine),
            flow: Arc::new(flow),
            closed: AtomicBool::new(false),
        })
    }

    /// 替换等待参数（必须在开始转换之前调用）
    pub fn with_timeouts(mut self, timeouts: WaitTimeouts) -> Result<Self> {
        let flow = Arc::try_unwrap(self.flow)
            .map_err(|_| anyhow::anyhow!("转换已开始，无法修改等待参数"))?;
        self.flow = Arc::new(flow.with_timeouts(timeouts));
        Ok(self)
    }

    /// 运行应用主逻辑
    ///
    /// 指定了单个文件时只转换该文件，否则转换整个输入目录。
    pub async fn run(&self) -> Result<BatchStats> {
        match self.settings.single_file.clone() {
            Some(file) => self.convert_single(&file).await,
            None => self.convert_all(self.settings.concurrency()).await,
        }
    }

    /// 转换输入目录下的所有文档
    ///
    /// 无论成功与否，返回前都会关闭渲染引擎。
    pub async fn convert_all(&self, concurrency: usize) -> Result<BatchStats> {
        let result = self.convert_all_inner(concurrency.max(1)).await;
        self.shutdown().await;
        result
    }

    /// 只转换一个文件（相对路径按当前目录解析）
    ///
    /// 无论成功与否，返回前都会关闭渲染引擎。
    pub async fn convert_single(&self, path: &Path) -> Result<BatchStats> {
        let result = self.convert_single_inner(path).await;
        self.shutdown().await;
        result
    }

    /// 渲染引擎是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn convert_all_inner(&self, concurrency: usize) -> Result<BatchStats> {
        info!("\n📁 正在扫描待转换的文档...");
        let files = discover_html_files(&self.input_root, &self.flow.config().exclude_files)
            .await
            .with_context(|| format!("扫描输入目录失败: {}", self.input_root.display()))?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待转换的 HTML 文件，程序结束");
            let stats = BatchStats::new(0);
            print_final_stats(&stats);
            return Ok(stats);
        }

        let total = files.len();
        log_documents_found(total, concurrency);

        let documents: Vec<DocumentCtx> = files
            .into_iter()
            .enumerate()
            .map(|(i, path)| DocumentCtx::new(i + 1, total, self.flow.describe(path)))
            .collect();

        let mut stats = BatchStats::new(total);
        if concurrency <= 1 {
            self.process_sequential(documents, &mut stats).await;
        } else {
            self.process_chunks(documents, concurrency, &mut stats).await?;
        }

        print_final_stats(&stats);
        Ok(stats)
    }

    async fn convert_single_inner(&self, path: &Path) -> Result<BatchStats> {
        let path = absolute(path)?;
        info!("📄 单文件模式: {}", path.display());

        let ctx = DocumentCtx::new(1, 1, self.flow.describe(path));
        let mut stats = BatchStats::new(1);
        self.process_sequential(vec![ctx], &mut stats).await;

        print_final_stats(&stats);
        Ok(stats)
    }

    /// 顺序处理，每个文档开始前输出进度
    async fn process_sequential(&self, documents: Vec<DocumentCtx>, stats: &mut BatchStats) {
        for ctx in documents {
            log_progress(ctx.index, ctx.total, ctx.percent(), &ctx.descriptor.file_name());
            let path = ctx.descriptor.path.clone();
            let outcome = join_document(&ctx.to_string(), self.spawn_document(ctx)).await;
            stats.record(path, &outcome);
        }
    }

    /// 分批处理：批内并发，整批完成后再开始下一批
    async fn process_chunks(
        &self,
        documents: Vec<DocumentCtx>,
        concurrency: usize,
        stats: &mut BatchStats,
    ) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let total = documents.len();
        let total_chunks = total.div_ceil(concurrency);

        for (chunk_index, chunk) in documents.chunks(concurrency).enumerate() {
            let chunk_num = chunk_index + 1;
            let start = chunk_index * concurrency + 1;
            log_chunk_start(chunk_num, total_chunks, start, start + chunk.len() - 1, total);

            let mut handles = Vec::with_capacity(chunk.len());
            for ctx in chunk {
                let permit = semaphore.clone().acquire_owned().await?;
                let label = ctx.to_string();
                let path = ctx.descriptor.path.clone();
                let engine = self.engine.clone();
                let flow = self.flow.clone();
                let ctx = ctx.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    process_document(engine.as_ref(), &flow, &ctx).await
                });
                handles.push((label, path, handle));
            }

            // 等待本批所有任务完成
            let mut success = 0;
            for (label, path, handle) in handles {
                let outcome = join_document(&label, handle).await;
                if outcome.is_success() {
                    success += 1;
                }
                stats.record(path, &outcome);
            }

            log_chunk_complete(chunk_num, success, chunk.len());
        }

        Ok(())
    }

    fn spawn_document(&self, ctx: DocumentCtx) -> JoinHandle<ConversionOutcome> {
        let engine = self.engine.clone();
        let flow = self.flow.clone();
        tokio::spawn(async move { process_document(engine.as_ref(), &flow, &ctx).await })
    }

    /// 关闭渲染引擎（只执行一次）
    async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.engine.close().await {
            error!("关闭渲染引擎失败: {}", e);
        }
    }
}

/// 等待文档任务结束，任务崩溃也算失败
async fn join_document(label: &str, handle: JoinHandle<ConversionOutcome>) -> ConversionOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{} 任务执行失败: {}", label, e);
            ConversionOutcome::Failure {
                error: format!("任务执行失败: {}", e),
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("无法解析路径: {}", path.display()))
}
