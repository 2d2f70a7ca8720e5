//! # apply 子命令 CLI 定义
//!
//! 扫描、预览并把重命名提交到文件系统。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/apply.rs`

use crate::cli::ScanOpts;
use clap::Args;

/// apply 子命令参数
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub scan: ScanOpts,

    /// Write a CSV audit log next to the renamed entries
    #[arg(long)]
    pub log: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}
