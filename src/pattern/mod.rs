//! # 重命名模式引擎
//!
//! 把用户模式编译为变换器，按序应用到每个条目的名称上。
//!
//! ## 功能
//! - 字面量/正则目标编译，非法正则静默丢弃
//! - 替换文本特殊标记：`$d` 目录名、`$n<>` 连续编号、
//!   `$t<>` / `$u<>` 时间戳（逐文件递归解析）
//! - `\u` `\l` `\h` `\f` `\n` 转义求值器
//! - 链式应用与非法文件名修复
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 使用
//! - 使用 `models/` 的条目与设置类型

pub mod chain;
pub mod charform;
pub mod compiler;
pub mod escape;
pub mod sanitize;
pub mod serial;
pub mod timefmt;

pub use chain::{ChainOutcome, TransformerChain};
pub use compiler::{PatternKind, Transformer};
pub use serial::{BatchSnapshot, SerialParams};

use crate::models::FileEntry;
use chrono::{DateTime, Local};
use std::path::Path;

/// 单个条目的变换上下文：路径、时间戳与批次快照。
/// 上下文对变换器只读；标记解析逐文件进行，跨文件不缓存。
pub struct RenameContext<'a> {
    pub path: &'a Path,
    pub is_directory: bool,
    pub created: Option<DateTime<Local>>,
    pub modified: DateTime<Local>,
    pub snapshot: &'a BatchSnapshot,
}

impl<'a> RenameContext<'a> {
    pub fn for_entry(entry: &'a FileEntry, snapshot: &'a BatchSnapshot) -> Self {
        Self {
            path: &entry.input_path,
            is_directory: entry.is_directory,
            created: entry.created,
            modified: entry.modified,
            snapshot,
        }
    }

    /// 直接父目录的简单名称
    pub fn parent_name(&self) -> String {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
