//! # 数据模型模块
//!
//! 定义重命名引擎操作的核心数据结构。
//!
//! ## 依赖关系
//! - 被 `pattern/`, `batch/`, `commands/` 使用
//! - 子模块: entry, settings, message, cancel

pub mod cancel;
pub mod entry;
pub mod message;
pub mod settings;

pub use cancel::CancellationToken;
pub use entry::{FileEntry, RenameState};
pub use message::{null_sink, EngineEvent, EventSink, MessageLevel, ProgressInfo, UserMessage};
pub use settings::{PatternSpec, RenameSettings};
