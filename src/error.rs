use std::path::PathBuf;
use thiserror::Error;

/// 导出流程错误类型
///
/// 只描述"出了什么错"，是否致命由调用方决定：
/// - 编排层把浏览器启动错误视为致命
/// - 文档流程把导航超时和导出失败视为单个文档失败
/// - 其余阶段的错误降级为警告
#[derive(Debug, Error)]
pub enum ExportError {
    /// 浏览器协议错误（CDP）
    #[error("浏览器错误: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// 渲染引擎生命周期错误（启动、关闭）
    #[error("渲染引擎错误: {0}")]
    Engine(String),

    /// 页面脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSS 选择器无法解析
    #[error("无效的选择器: {0}")]
    Selector(String),

    /// 二维码编码失败
    #[error("二维码生成失败: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// 等待超时
    #[error("{what} 超时 ({ms}ms)")]
    Timeout { what: String, ms: u64 },

    /// 渲染上下文返回的其他错误
    #[error("渲染失败: {0}")]
    Render(String),
}

// ========== 便捷构造函数 ==========

impl ExportError {
    /// 创建文件错误
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::File {
            path: path.into(),
            source,
        }
    }

    /// 创建超时错误
    pub fn timeout(what: impl Into<String>, ms: u64) -> Self {
        ExportError::Timeout {
            what: what.into(),
            ms,
        }
    }

    /// 创建渲染错误
    pub fn render(message: impl Into<String>) -> Self {
        ExportError::Render(message.into())
    }

    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExportError::Timeout { .. })
    }
}

// ========== Result 类型别名 ==========

/// 导出流程结果类型
pub type Result<T> = std::result::Result<T, ExportError>;
