//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档、是哪个文档"这一信息

use std::fmt::Display;

use crate::models::document::DocumentDescriptor;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档序号（从 1 开始，仅用于日志显示）
    pub index: usize,

    /// 本次批量转换的文档总数
    pub total: usize,

    pub descriptor: DocumentDescriptor,
}

impl DocumentCtx {
    /// 创建新的文档上下文
    pub fn new(index: usize, total: usize, descriptor: DocumentDescriptor) -> Self {
        Self {
            index,
            total,
            descriptor,
        }
    }

    /// 进度百分比
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.index * 100 / self.total
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文档 {}/{} {}]",
            self.index,
            self.total,
            self.descriptor.file_name()
        )
    }
}
