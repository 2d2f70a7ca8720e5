//! # 批处理控制器
//!
//! 持有共享条目集合，编排 扫描 → 变换 → 提交 三个阶段。
//! 同一时刻只允许一个改变状态的操作（单飞不变量），对外暴露
//! `is_idle`。扫描与提交可协作取消；变换阶段一旦开始即运行到底。
//!
//! ## 状态机
//! - `Idle → Loading → Idle`（扫描；取消时整体丢弃部分结果）
//! - `Idle → Replacing → Idle`（并行链式变换 + 冲突检测）
//! - `Idle → Renaming → Idle`（提交；取消不回滚已完成的重命名）
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `batch/scanner.rs`, `batch/conflict.rs`, `batch/fsops.rs`,
//!   `batch/audit.rs`, `pattern/`
//! - 使用 `rayon` 并行应用变换链

use crate::batch::audit::{self, AuditRecord};
use crate::batch::{conflict, fsops, scanner};
use crate::error::{RenkitError, Result};
use crate::models::{
    CancellationToken, EngineEvent, EventSink, FileEntry, ProgressInfo, RenameSettings,
    RenameState, UserMessage,
};
use crate::pattern::{BatchSnapshot, RenameContext, TransformerChain};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

/// 提交阶段的进度/取消采样间隔
pub const RENAME_PROGRESS_INTERVAL: usize = 16;

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Loading,
    Replacing,
    Renaming,
}

/// 变换阶段统计
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceSummary {
    /// 输出名发生变化的条目数
    pub replaced: usize,
    /// 输出路径冲突的条目数
    pub conflicted: usize,
}

/// 提交阶段统计
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    pub renamed: usize,
    pub failed: usize,
    /// 提交后底层路径消失而被剪除的条目数
    pub pruned: usize,
    pub canceled: bool,
    /// 审计日志路径（启用且有记录时）
    pub log_path: Option<PathBuf>,
}

/// 批量重命名控制器
pub struct BatchController {
    settings: RenameSettings,
    entries: Vec<FileEntry>,
    state: BatchState,
    sink: EventSink,
}

impl BatchController {
    pub fn new(settings: RenameSettings, sink: EventSink) -> Self {
        Self {
            settings,
            entries: Vec::new(),
            state: BatchState::Idle,
            sink,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == BatchState::Idle
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    fn message(&self, msg: UserMessage) {
        (self.sink)(EngineEvent::Message(msg));
    }

    fn progress(&self, count: usize, message: impl Into<String>) {
        (self.sink)(EngineEvent::Progress(ProgressInfo {
            count,
            message: message.into(),
        }));
    }

    /// 单飞守卫：非 Idle 时拒绝开始新操作
    fn begin(&mut self, next: BatchState, operation: &'static str) -> Result<()> {
        if self.state != BatchState::Idle {
            return Err(RenkitError::EngineBusy { operation });
        }
        self.state = next;
        Ok(())
    }

    /// 扫描根目录，重建条目集合。
    /// 取消时丢弃全部部分结果并发出含 "cancel" 的进度通知。
    pub fn load(&mut self, cancel: &CancellationToken) -> Result<usize> {
        self.begin(BatchState::Loading, "load")?;
        let result = scanner::scan(&self.settings, cancel, &self.sink);
        self.state = BatchState::Idle;

        match result {
            Ok(found) => {
                self.entries = found;
                self.progress(
                    self.entries.len(),
                    format!("Scanned {} target(s)", self.entries.len()),
                );
                Ok(self.entries.len())
            }
            Err(RenkitError::OperationCanceled) => {
                self.entries.clear();
                self.progress(0, "Scan canceled; partial results discarded");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// 并行应用变换链并重新计算冲突。不可取消。
    pub fn apply_patterns(&mut self) -> Result<ReplaceSummary> {
        self.begin(BatchState::Replacing, "replace")?;

        let chain = TransformerChain::compile(
            &self.settings.delete_patterns,
            &self.settings.replace_patterns,
            self.settings.rename_extension,
        );
        // 并行分发前的只读全局路径快照
        let snapshot =
            BatchSnapshot::new(self.entries.iter().map(|e| e.input_path.clone()).collect());

        let outcomes: Vec<_> = self
            .entries
            .par_iter()
            .map(|entry| {
                let ctx = RenameContext::for_entry(entry, &snapshot);
                chain.apply(&entry.input_name(), &ctx)
            })
            .collect();

        // 合并结果与告警：单线程
        for (entry, outcome) in self.entries.iter_mut().zip(outcomes) {
            entry.output_name = outcome.name;
            if !outcome.violations.is_empty() {
                (self.sink)(EngineEvent::Message(UserMessage::alert(
                    "Invalid filename repaired",
                    format!(
                        "{}: {}",
                        entry.input_name(),
                        outcome.violations.join("; ")
                    ),
                )));
            }
        }

        let conflicted = conflict::mark_conflicts(&mut self.entries);
        if conflicted > 0 {
            let mut seen = HashSet::new();
            let duplicated: Vec<String> = self
                .entries
                .iter()
                .filter(|e| e.is_conflicted)
                .map(|e| e.output_name.clone())
                .filter(|name| seen.insert(name.to_lowercase()))
                .collect();
            self.message(UserMessage::alert(
                "Output name conflicts detected",
                duplicated.join(", "),
            ));
        }

        let replaced = self.entries.iter().filter(|e| e.is_changed()).count();
        self.state = BatchState::Idle;
        Ok(ReplaceSummary {
            replaced,
            conflicted,
        })
    }

    /// 提交重命名。冲突未消除时拒绝执行；
    /// 取消只停止剩余迭代，已完成的重命名保留在磁盘上。
    pub fn commit(&mut self, cancel: &CancellationToken) -> Result<RenameSummary> {
        self.begin(BatchState::Renaming, "rename")?;

        let conflicted = self.entries.iter().filter(|e| e.is_conflicted).count();
        if conflicted > 0 {
            self.state = BatchState::Idle;
            return Err(RenkitError::ConflictsUnresolved { count: conflicted });
        }

        let mut records: Vec<AuditRecord> = Vec::new();
        let mut failures: Vec<(String, RenkitError)> = Vec::new();
        let mut renamed = 0usize;
        let mut canceled = false;

        for i in 0..self.entries.len() {
            if i % RENAME_PROGRESS_INTERVAL == 0 {
                if cancel.is_cancelled() {
                    canceled = true;
                    break;
                }
                let current = self.entries[i].input_path.display().to_string();
                self.progress(i, current);
            }

            if !self.entries[i].is_changed() {
                continue;
            }

            let from = self.entries[i].input_path.clone();
            let to = self.entries[i].output_path();
            match fsops::rename_entry(&from, &to) {
                Ok(()) => {
                    let entry = &mut self.entries[i];
                    entry.state = RenameState::Renamed;
                    entry.input_path = to.clone();
                    records.push(AuditRecord {
                        state: RenameState::Renamed,
                        input: from,
                        output: to,
                    });
                    renamed += 1;
                }
                Err(err) => {
                    self.entries[i].state = RenameState::FailedToRename;
                    records.push(AuditRecord {
                        state: RenameState::FailedToRename,
                        input: from.clone(),
                        output: to,
                    });
                    failures.push((from.display().to_string(), err));
                }
            }
        }

        if canceled {
            self.progress(renamed, "Rename canceled; remaining entries skipped");
        }

        if !failures.is_empty() {
            let body: Vec<String> = failures
                .iter()
                .map(|(path, err)| format!("{}: {}", path, err))
                .collect();
            self.message(UserMessage::error(
                format!("Failed to rename {} item(s)", failures.len()),
                body.join("\n"),
            ));
        }

        // 剪除底层路径已消失的条目（祖先目录被改名）
        let mut removed: Vec<String> = Vec::new();
        self.entries.retain(|entry| {
            if entry.input_path.exists() {
                true
            } else {
                removed.push(entry.input_path.display().to_string());
                false
            }
        });
        if !removed.is_empty() {
            self.message(UserMessage::info(
                format!("Removed {} vanished entr(y/ies) from the list", removed.len()),
                removed.join("\n"),
            ));
        }

        let mut log_path = None;
        if self.settings.audit_log && !records.is_empty() {
            match audit::write_audit_log(&records) {
                Ok(path) => {
                    if let Some(path) = &path {
                        self.message(UserMessage::info(
                            "Audit log written",
                            path.display().to_string(),
                        ));
                    }
                    log_path = path;
                }
                Err(err) => {
                    self.message(UserMessage::error("Failed to write audit log", err.to_string()));
                }
            }
        }

        self.state = BatchState::Idle;
        Ok(RenameSummary {
            renamed,
            failed: failures.len(),
            pruned: removed.len(),
            canceled,
            log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageLevel, PatternSpec};
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    type EventLog = Arc<Mutex<Vec<EngineEvent>>>;

    fn recording_sink() -> (EventSink, EventLog) {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let clone = events.clone();
        let sink: EventSink = Box::new(move |event| clone.lock().unwrap().push(event));
        (sink, events)
    }

    fn settings_for(root: &Path) -> RenameSettings {
        RenameSettings {
            roots: vec![root.to_path_buf()],
            ..RenameSettings::default()
        }
    }

    fn alerts(events: &EventLog) -> Vec<UserMessage> {
        events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Message(m) if m.level == MessageLevel::Alert => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn progress_messages(events: &EventLog) -> Vec<String> {
        events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Progress(p) => Some(p.message.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_flight_guard() {
        let (sink, _) = recording_sink();
        let mut controller = BatchController::new(RenameSettings::default(), sink);
        assert!(controller.is_idle());

        controller.begin(BatchState::Renaming, "rename").unwrap();
        assert!(!controller.is_idle());
        assert!(matches!(
            controller.begin(BatchState::Loading, "load"),
            Err(RenkitError::EngineBusy { operation: "load" })
        ));
    }

    #[test]
    fn test_end_to_end_replace_and_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["A.txt", "B.csv", "C.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let mut settings = settings_for(dir.path());
        settings.rename_extension = true;
        settings.replace_patterns = vec![
            PatternSpec::literal("B.csv", "A.txt"),
            PatternSpec::literal("C.txt", "A.txt"),
        ];

        let (sink, events) = recording_sink();
        let mut controller = BatchController::new(settings, sink);
        let token = CancellationToken::new();

        assert_eq!(controller.load(&token).unwrap(), 3);
        let summary = controller.apply_patterns().unwrap();
        assert_eq!(summary.replaced, 2);
        assert_eq!(summary.conflicted, 3);
        assert!(controller.is_idle());

        // 恰好一个 Alert，列出重复的输出名
        let alerts = alerts(&events);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].body.contains("A.txt"));

        // 冲突未消除时拒绝提交
        assert!(matches!(
            controller.commit(&token),
            Err(RenkitError::ConflictsUnresolved { count: 3 })
        ));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_invalid_character_repair_emits_single_alert() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a-b.txt"), "").unwrap();

        let mut settings = settings_for(dir.path());
        settings.replace_patterns = vec![PatternSpec::literal("-", ":")];

        let (sink, events) = recording_sink();
        let mut controller = BatchController::new(settings, sink);
        controller.load(&CancellationToken::new()).unwrap();
        controller.apply_patterns().unwrap();

        assert_eq!(controller.entries()[0].output_name, "a_b.txt");
        assert_eq!(alerts(&events).len(), 1);
    }

    #[test]
    fn test_commit_renames_and_writes_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo1.jpg"), "").unwrap();
        fs::write(dir.path().join("photo2.jpg"), "").unwrap();

        let mut settings = settings_for(dir.path());
        settings.replace_patterns = vec![PatternSpec::literal("photo", "img")];
        settings.audit_log = true;

        let (sink, _) = recording_sink();
        let mut controller = BatchController::new(settings, sink);
        let token = CancellationToken::new();

        controller.load(&token).unwrap();
        let replace = controller.apply_patterns().unwrap();
        assert_eq!(replace.replaced, 2);
        assert_eq!(replace.conflicted, 0);

        let summary = controller.commit(&token).unwrap();
        assert_eq!(summary.renamed, 2);
        assert_eq!(summary.failed, 0);
        assert!(!summary.canceled);

        assert!(dir.path().join("img1.jpg").exists());
        assert!(dir.path().join("img2.jpg").exists());
        assert!(!dir.path().join("photo1.jpg").exists());

        // 条目状态与路径已更新
        assert!(controller
            .entries()
            .iter()
            .all(|e| e.state == RenameState::Renamed));

        // 审计日志落在公共祖先目录
        let log = summary.log_path.unwrap();
        assert_eq!(log.parent().unwrap(), dir.path());
        let content = fs::read_to_string(&log).unwrap();
        assert!(content.starts_with("\"State\""));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_commit_prunes_entries_under_renamed_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("old_dir")).unwrap();
        fs::write(dir.path().join("old_dir/inner.txt"), "").unwrap();

        let mut settings = settings_for(dir.path());
        settings.include_directories = true;
        settings.replace_patterns = vec![PatternSpec::literal("old_dir", "new_dir")];

        let (sink, events) = recording_sink();
        let mut controller = BatchController::new(settings, sink);
        let token = CancellationToken::new();

        controller.load(&token).unwrap();
        controller.apply_patterns().unwrap();
        let summary = controller.commit(&token).unwrap();

        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.pruned, 1);
        assert!(dir.path().join("new_dir/inner.txt").exists());
        // 剪除的子条目通过 Info 消息上报
        let infos: Vec<UserMessage> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Message(m) if m.level == MessageLevel::Info => Some(m.clone()),
                _ => None,
            })
            .collect();
        assert!(infos.iter().any(|m| m.body.contains("inner.txt")));
    }

    #[test]
    fn test_scan_cancellation_yields_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10_050usize {
            fs::write(dir.path().join(format!("f{:05}.txt", i)), "").unwrap();
        }

        let (sink, events) = recording_sink();
        let mut controller = BatchController::new(settings_for(dir.path()), sink);

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(controller.load(&token).unwrap(), 0);
        assert!(controller.entries().is_empty());
        assert!(progress_messages(&events)
            .iter()
            .any(|m| m.to_lowercase().contains("cancel")));
    }

    #[test]
    fn test_apply_patterns_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("report_old.txt"), "").unwrap();

        let mut settings = settings_for(dir.path());
        settings.delete_patterns = vec![PatternSpec::literal("_old", "")];

        let (sink, _) = recording_sink();
        let mut controller = BatchController::new(settings, sink);
        controller.load(&CancellationToken::new()).unwrap();

        let first = controller.apply_patterns().unwrap();
        let name_after_first = controller.entries()[0].output_name.clone();
        let second = controller.apply_patterns().unwrap();

        assert_eq!(first.replaced, second.replaced);
        assert_eq!(controller.entries()[0].output_name, name_after_first);
        assert_eq!(name_after_first, "report.txt");
    }
}
