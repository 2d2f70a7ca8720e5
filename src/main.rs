//! # renkit - 批量文件重命名工具
//!
//! 把有序的删除/替换模式应用到扫描出的文件与目录名上，
//! 先预览（含冲突检测）再提交，支持取消与 CSV 审计日志。
//!
//! ## 子命令
//! - `preview` - 扫描并展示重命名预览（不落盘）
//! - `apply`   - 扫描、预览并提交重命名
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/    (扫描/变换/提交编排)
//!   │     ├── pattern/  (模式编译与标记解析)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod pattern;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "renkit=debug"
    } else {
        "renkit=warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
