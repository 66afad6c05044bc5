use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use site_pdf_export::utils::logging;
use site_pdf_export::{App, Settings};

/// 把站点生成器输出的 HTML 页面批量导出为 PDF
#[derive(Parser, Debug)]
#[command(name = "site-pdf-export", version, about)]
struct Cli {
    /// 输入目录（站点的 dist 目录）
    #[arg(short, long, env = "PDF_EXPORT_INPUT", default_value = "../dist")]
    input: PathBuf,

    /// PDF 输出目录
    #[arg(short, long, env = "PDF_EXPORT_OUTPUT", default_value = "./output")]
    output: PathBuf,

    /// JSON 配置文件
    #[arg(short, long, env = "PDF_EXPORT_CONFIG", default_value = "./config/config.json")]
    config: PathBuf,

    /// 打印样式表
    #[arg(short, long, env = "PDF_EXPORT_STYLES", default_value = "./config/styles.css")]
    styles: PathBuf,

    /// 只转换这一个文件
    #[arg(short, long, env = "PDF_EXPORT_FILE")]
    file: Option<PathBuf>,

    /// 同时转换的文档数量
    #[arg(short, long, env = "PDF_EXPORT_PARALLEL", default_value_t = 1)]
    parallel: usize,

    /// 浏览器可执行文件
    #[arg(long, env = "PDF_EXPORT_CHROME")]
    chrome: Option<PathBuf>,

    /// 连接已开启远程调试的浏览器，而不是启动新的
    #[arg(long, env = "PDF_EXPORT_BROWSER_PORT")]
    browser_port: Option<u16>,

    /// 详细日志
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// 只输出警告和错误
    #[arg(short, long)]
    quiet: bool,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            input_dir: cli.input,
            output_dir: cli.output,
            config_path: cli.config,
            stylesheet_path: cli.styles,
            single_file: cli.file,
            parallel: cli.parallel,
            chrome_executable: cli.chrome,
            browser_debug_port: cli.browser_port,
            verbose: cli.verbose,
            quiet: cli.quiet,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from(Cli::parse());

    // 初始化日志
    logging::init(settings.verbose, settings.quiet);

    // 初始化并运行应用
    let stats = App::initialize(settings).await?.run().await?;

    if stats.failed > 0 {
        tracing::warn!("⚠️ {} 个文档转换失败", stats.failed);
    }

    Ok(())
}
