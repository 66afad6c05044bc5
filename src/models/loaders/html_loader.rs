use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 待转换文件的扩展名
pub const HTML_EXTENSION: &str = "html";

/// 路径是否包含任一子串（不是 glob / 正则）
pub fn matches_any(path: &Path, patterns: &[String]) -> bool {
    let path = path.to_string_lossy();
    patterns.iter().any(|pattern| path.contains(pattern.as_str()))
}

/// 递归扫描目录下所有 HTML 文件
///
/// # 参数
/// - `folder`: 输入根目录
/// - `exclude_patterns`: 路径中包含任一子串即跳过
///
/// # 返回
/// 按路径排序后的文件列表（即转换顺序）
pub async fn discover_html_files(folder: &Path, exclude_patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder.display());
    }

    let mut html_files = Vec::new();
    let mut pending = vec![folder.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .with_context(|| format!("无法读取文件类型: {}", path.display()))?;

            if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some(HTML_EXTENSION) {
                if matches_any(&path, exclude_patterns) {
                    tracing::debug!("跳过排除的文件: {}", path.display());
                    continue;
                }
                html_files.push(path);
            }
        }
    }

    html_files.sort();
    Ok(html_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "<html></html>").unwrap();
    }

    #[tokio::test]
    async fn test_discover_recursive_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("index.html"));
        touch(&root.join("b/report.html"));
        touch(&root.join("a/chart.html"));
        touch(&root.join("404.html"));
        touch(&root.join("_observablehq/theme.html"));
        touch(&root.join("a/data.csv"));

        let excludes = vec!["404.html".to_string(), "_observablehq".to_string()];
        let files = discover_html_files(root, &excludes).await.unwrap();

        assert_eq!(
            files,
            vec![
                root.join("a/chart.html"),
                root.join("b/report.html"),
                root.join("index.html"),
            ]
        );
    }

    #[test]
    fn test_matches_any_is_plain_substring() {
        let patterns = vec!["404".to_string(), "_observablehq".to_string()];
        assert!(matches_any(Path::new("/dist/404.html"), &patterns));
        assert!(matches_any(Path::new("/dist/_observablehq/a.html"), &patterns));
        assert!(!matches_any(Path::new("/dist/index.html"), &patterns));
        assert!(!matches_any(Path::new("/dist/4*.html"), &["4*4".to_string()]));
    }

    #[tokio::test]
    async fn test_discover_missing_folder() {
        let result = discover_html_files(Path::new("/no/such/dist"), &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_discover_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover_html_files(dir.path(), &[]).await.unwrap();
        assert!(files.is_empty());
    }
}
