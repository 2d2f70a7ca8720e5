//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `preview`: 扫描并展示重命名预览（不落盘）
//! - `apply`: 扫描、预览并提交重命名
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: preview, apply

pub mod apply;
pub mod preview;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// renkit - 批量文件重命名工具
#[derive(Parser)]
#[command(name = "renkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A pattern-based batch file renamer with preview and conflict detection", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Preview the batch rename without touching the disk
    Preview(preview::PreviewArgs),

    /// Apply the batch rename to the filesystem
    Apply(apply::ApplyArgs),
}

/// 预览与提交共用的扫描/模式参数
#[derive(Args, Debug)]
pub struct ScanOpts {
    /// Root directories to scan
    #[arg(value_name = "ROOT", default_value = ".")]
    pub roots: Vec<PathBuf>,

    /// JSON rules file with pattern lists and scan flags
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Delete pattern (repeatable, applied before replacements)
    #[arg(short, long, action = clap::ArgAction::Append, value_name = "TARGET")]
    pub delete: Vec<String>,

    /// Replace pattern as a TARGET TEXT pair (repeatable)
    #[arg(
        short = 'p',
        long = "replace",
        num_args = 2,
        value_names = ["TARGET", "TEXT"],
        action = clap::ArgAction::Append
    )]
    pub replace: Vec<String>,

    /// Treat command-line patterns as regular expressions
    #[arg(long)]
    pub regex: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Include directories as rename targets
    #[arg(long)]
    pub include_dirs: bool,

    /// Exclude files (only meaningful together with --include-dirs)
    #[arg(long)]
    pub exclude_files: bool,

    /// Do not recurse into subdirectories
    #[arg(long)]
    pub no_recurse: bool,

    /// Glob filter on file names (e.g. "*.jpg")
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Regex of extensions to ignore (e.g. "bak|tmp")
    #[arg(long, value_name = "REGEX")]
    pub ignore_ext: Option<String>,

    /// Apply patterns to the file extension as well
    #[arg(long)]
    pub rename_ext: bool,

    /// Number of parallel jobs for the replace phase (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
