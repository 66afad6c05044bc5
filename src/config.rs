use std::path::PathBuf;

/// 程序运行配置
///
/// 与 `ExportConfig`（JSON 文档）区分：这里只放路径、并发度、日志级别等运行参数，
/// 由命令行参数或环境变量填充。
#[derive(Clone, Debug)]
pub struct Settings {
    /// 输入目录（站点生成器的 dist 目录）
    pub input_dir: PathBuf,
    /// PDF 输出目录
    pub output_dir: PathBuf,
    /// JSON 配置文件路径
    pub config_path: PathBuf,
    /// 打印样式表路径
    pub stylesheet_path: PathBuf,
    /// 只转换单个文件
    pub single_file: Option<PathBuf>,
    /// 同时转换的文档数量
    pub parallel: usize,
    /// 浏览器可执行文件（不指定时由 chromiumoxide 自动查找）
    pub chrome_executable: Option<PathBuf>,
    /// 连接已有浏览器的远程调试端口（设置后不再启动无头浏览器）
    pub browser_debug_port: Option<u16>,
    /// 是否显示详细日志
    pub verbose: bool,
    /// 安静模式
    pub quiet: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("../dist"),
            output_dir: PathBuf::from("./output"),
            config_path: PathBuf::from("./config/config.json"),
            stylesheet_path: PathBuf::from("./config/styles.css"),
            single_file: None,
            parallel: 1,
            chrome_executable: None,
            browser_debug_port: None,
            verbose: false,
            quiet: false,
        }
    }
}

impl Settings {
    /// 实际使用的并发度（至少为 1）
    pub fn concurrency(&self) -> usize {
        self.parallel.max(1)
    }
}
