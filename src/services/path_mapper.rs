//! 输出路径映射
//!
//! 输入目录结构原样镜像到输出目录，只替换扩展名。

use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = ".html";
pub const TARGET_EXTENSION: &str = ".pdf";

/// 计算输出路径
///
/// 取输入文件相对输入根目录的路径，挂到输出根目录下，再把第一个 `.html` 换成 `.pdf`。
/// 不在输入根目录下的文件（单文件模式）只保留文件名。
pub fn map_path(input: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    let relative = input
        .strip_prefix(input_root)
        .ok()
        .or_else(|| input.file_name().map(Path::new))
        .unwrap_or(input);
    let joined = output_root.join(relative);
    let mapped = joined
        .to_string_lossy()
        .replacen(SOURCE_EXTENSION, TARGET_EXTENSION, 1);
    PathBuf::from(mapped)
}
