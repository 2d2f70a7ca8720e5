//! # 重命名审计日志
//!
//! 提交阶段可选产出的 UTF-8 CSV：表头
//! `State,InputFilePath,OutputFilePath`，每个状态非 None 的条目
//! 一行，路径字段加引号。写入各条目的最浅公共祖先目录；
//! 目标文件名已被占用时追加数字后缀直到可用。
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 在提交结束时调用
//! - 使用 `csv` 库写入（参照导出器惯例）
//! - 使用 `batch/fsops.rs` 计算公共祖先

use crate::batch::fsops;
use crate::error::{RenkitError, Result};
use crate::models::RenameState;

use std::path::{Path, PathBuf};

/// 审计日志文件主名
pub const AUDIT_LOG_STEM: &str = "renkit_rename_log";

/// 一次提交中单个条目的审计记录（在条目路径被更新前采集）
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub state: RenameState,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// 在目录下找一个未被占用的日志文件名
fn unoccupied_log_path(dir: &Path) -> PathBuf {
    let base = dir.join(format!("{}.csv", AUDIT_LOG_STEM));
    if !base.exists() {
        return base;
    }
    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.csv", AUDIT_LOG_STEM, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 选择日志落盘目录：记录输入路径的最浅公共祖先，
/// 向上回退到仍然存在的目录（祖先可能刚被改名）。
fn log_directory(records: &[AuditRecord]) -> Option<PathBuf> {
    let parents: Vec<PathBuf> = records
        .iter()
        .filter_map(|r| r.input.parent().map(Path::to_path_buf))
        .collect();
    let mut dir = fsops::common_ancestor(&parents)?;
    while !dir.is_dir() {
        dir = dir.parent()?.to_path_buf();
    }
    Some(dir)
}

/// 写出审计日志，返回写入的路径。无记录时返回 None。
pub fn write_audit_log(records: &[AuditRecord]) -> Result<Option<PathBuf>> {
    let rows: Vec<&AuditRecord> = records
        .iter()
        .filter(|r| r.state != RenameState::None)
        .collect();
    if rows.is_empty() {
        return Ok(None);
    }

    let Some(dir) = log_directory(records) else {
        return Ok(None);
    };
    let log_path = unoccupied_log_path(&dir);

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(&log_path)
        .map_err(RenkitError::CsvError)?;

    wtr.write_record(["State", "InputFilePath", "OutputFilePath"])
        .map_err(RenkitError::CsvError)?;

    for record in rows {
        let input = record.input.display().to_string();
        let output = record.output.display().to_string();
        wtr.write_record([record.state.as_str(), input.as_str(), output.as_str()])
            .map_err(RenkitError::CsvError)?;
    }

    wtr.flush().map_err(|e| RenkitError::FileWriteError {
        path: log_path.display().to_string(),
        source: e,
    })?;

    Ok(Some(log_path))
}
