use std::path::PathBuf;
use std::time::{Duration, Instant};

/// 单个文档的转换结果
///
/// 失败也是结果：只记录，不向上抛出。
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Success {
        output_path: PathBuf,
        bytes: u64,
        duration: Duration,
        /// 非致命问题
        warnings: Vec<String>,
    },
    Failure {
        error: String,
    },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

/// 批量转换统计
///
/// 只由编排层修改，计数只增不减。
#[derive(Debug, Clone)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub started_at: Instant,
    /// 失败的文档及错误信息
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            successful: 0,
            failed: 0,
            started_at: Instant::now(),
            failures: Vec::new(),
        }
    }

    /// 记录一个文档的结果
    pub fn record(&mut self, path: PathBuf, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Success { .. } => self.successful += 1,
            ConversionOutcome::Failure { error } => {
                self.failed += 1;
                self.failures.push((path, error.clone()));
            }
        }
    }

    /// 所有文档都已有结果
    pub fn is_complete(&self) -> bool {
        self.successful + self.failed == self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut stats = BatchStats::new(2);
        assert!(!stats.is_complete());

        stats.record(
            PathBuf::from("a.html"),
            &ConversionOutcome::Success {
                output_path: PathBuf::from("a.pdf"),
                bytes: 10,
                duration: Duration::from_millis(5),
                warnings: vec![],
            },
        );
        stats.record(
            PathBuf::from("b.html"),
            &ConversionOutcome::Failure {
                error: "boom".to_string(),
            },
        );

        assert_eq!(stats.successful, 1);
        assert_eq!(stats.failed, 1);
        assert!(stats.is_complete());
        assert_eq!(stats.failures, vec![(PathBuf::from("b.html"), "boom".to_string())]);
    }
}
