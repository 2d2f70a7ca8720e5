//! # preview 命令实现
//!
//! 扫描目标、应用模式链并以表格展示重命名预览，不改动磁盘。
//!
//! ## 依赖关系
//! - 使用 `cli/preview.rs` 定义的参数
//! - 使用 `batch/controller.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`
//! - 使用 `tabled` 渲染表格，`console` 截断过长路径

use crate::batch::BatchController;
use crate::cli::preview::PreviewArgs;
use crate::error::Result;
use crate::models::{CancellationToken, FileEntry};
use crate::utils::{output, progress};

use colored::Colorize;
use console::Term;
use std::time::Instant;
use tabled::{Table, Tabled};

/// 预览表格行
#[derive(Debug, Tabled)]
struct PreviewRow {
    #[tabled(rename = "")]
    mark: String,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Output")]
    output: String,
}

/// 执行 preview 命令
pub fn execute(args: PreviewArgs) -> Result<()> {
    output::print_header("Rename Preview");

    let settings = super::build_settings(&args.scan)?;
    super::init_thread_pool(args.scan.jobs);

    let (sink, slot) = super::terminal_sink();
    let mut controller = BatchController::new(settings, sink);
    let token = CancellationToken::new();

    let started = Instant::now();
    let spinner = progress::create_spinner("Scanning targets...");
    slot.set(Some(spinner.clone()));
    let count = controller.load(&token)?;
    spinner.finish_and_clear();
    slot.set(None);

    if count == 0 {
        output::print_warning("No rename targets found.");
        return Ok(());
    }
    output::print_info(&format!(
        "Found {} target(s) in {:.2}s",
        count,
        started.elapsed().as_secs_f64()
    ));

    let summary = controller.apply_patterns()?;
    render_preview(controller.entries(), args.all);

    output::print_separator();
    output::print_done(&format!(
        "{} replaced, {} conflicted, {} total",
        summary.replaced,
        summary.conflicted,
        controller.entries().len()
    ));
    if summary.conflicted > 0 {
        output::print_warning("Resolve conflicts before running 'renkit apply'.");
    }

    Ok(())
}

/// 渲染预览表格（apply 命令复用）
pub fn render_preview(entries: &[FileEntry], show_all: bool) {
    let cell_width = cell_width();
    let rows: Vec<PreviewRow> = entries
        .iter()
        .filter(|e| show_all || e.is_changed() || e.is_conflicted)
        .map(|e| PreviewRow {
            mark: if e.is_conflicted {
                "!".red().bold().to_string()
            } else {
                String::new()
            },
            input: truncate(&e.input_name(), cell_width),
            output: truncate(&e.output_name, cell_width),
        })
        .collect();

    if rows.is_empty() {
        output::print_info("No entries changed.");
        return;
    }

    let table = Table::new(&rows);
    println!("{}", table);
}

/// 终端宽度的一半留给每个名称列
fn cell_width() -> usize {
    let (_, cols) = Term::stdout().size();
    ((cols as usize).saturating_sub(10) / 2).max(20)
}

fn truncate(text: &str, width: usize) -> String {
    console::truncate_str(text, width, "…").to_string()
}
