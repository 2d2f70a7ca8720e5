//! # preview 子命令 CLI 定义
//!
//! 扫描目标并展示重命名预览表格，不改动磁盘。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/preview.rs`

use crate::cli::ScanOpts;
use clap::Args;

/// preview 子命令参数
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub scan: ScanOpts,

    /// Show unchanged entries as well
    #[arg(long)]
    pub all: bool,
}
