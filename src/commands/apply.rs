//! # apply 命令实现
//!
//! 扫描、应用模式链、展示预览，确认后把重命名提交到文件系统。
//! 存在未消除的冲突时拒绝提交。
//!
//! ## 依赖关系
//! - 使用 `cli/apply.rs` 定义的参数
//! - 使用 `batch/controller.rs`
//! - 复用 `commands/preview.rs` 的表格渲染
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::BatchController;
use crate::cli::apply::ApplyArgs;
use crate::error::{RenkitError, Result};
use crate::models::CancellationToken;
use crate::utils::{output, progress};

use std::io::{self, Write};
use std::time::Instant;

/// 执行 apply 命令
pub fn execute(args: ApplyArgs) -> Result<()> {
    output::print_header("Batch Rename");

    let mut settings = super::build_settings(&args.scan)?;
    settings.audit_log = settings.audit_log || args.log;
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

    let summary = controller.apply_patterns()?;
    super::preview::render_preview(controller.entries(), false);

    if summary.conflicted > 0 {
        return Err(RenkitError::ConflictsUnresolved {
            count: summary.conflicted,
        });
    }
    if summary.replaced == 0 {
        output::print_info("Nothing to rename.");
        return Ok(());
    }

    if !args.yes && !confirm(&format!("Rename {} item(s)?", summary.replaced))? {
        output::print_info("Aborted.");
        return Ok(());
    }

    let pb = progress::create_progress_bar(controller.entries().len() as u64, "Renaming");
    slot.set(Some(pb.clone()));
    let rename = controller.commit(&token)?;
    pb.finish_and_clear();
    slot.set(None);

    output::print_separator();
    output::print_done(&format!(
        "{} renamed, {} failed, {} pruned in {:.2}s",
        rename.renamed,
        rename.failed,
        rename.pruned,
        started.elapsed().as_secs_f64()
    ));
    if let Some(log_path) = &rename.log_path {
        output::print_success(&format!("Audit log: {}", log_path.display()));
    }

    Ok(())
}

/// 终端确认提示
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|e| RenkitError::Other(format!("failed to read confirmation: {}", e)))?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
