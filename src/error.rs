//! # 统一错误处理模块
//!
//! 定义 renkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// renkit 统一错误类型
#[derive(Error, Debug)]
pub enum RenkitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to rename: {from} -> {to}")]
    RenameError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 设置与参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to parse rules file: {path}\nReason: {reason}")]
    RulesParseError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 批处理控制错误
    // ─────────────────────────────────────────────────────────────
    #[error("Engine is busy: cannot start '{operation}' while another operation is running")]
    EngineBusy { operation: &'static str },

    #[error("{count} name conflict(s) unresolved; refusing to rename")]
    ConflictsUnresolved { count: usize },

    #[error("Operation canceled")]
    OperationCanceled,

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RenkitError>;
