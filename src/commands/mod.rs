//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，并提供 CLI 参数到引擎设置的合成、
//! rayon 线程池初始化与终端事件 sink。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: preview, apply

pub mod apply;
pub mod preview;

use crate::cli::{Commands, ScanOpts};
use crate::error::{RenkitError, Result};
use crate::models::{EngineEvent, EventSink, MessageLevel, PatternSpec, RenameSettings};
use crate::utils::output;

use indicatif::ProgressBar;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Preview(args) => preview::execute(args),
        Commands::Apply(args) => apply::execute(args),
    }
}

/// 由规则文件与命令行参数合成引擎设置。
/// 命令行模式追加在规则文件模式之后，扫描开关只做开启覆盖。
pub fn build_settings(opts: &ScanOpts) -> Result<RenameSettings> {
    let mut settings = match &opts.rules {
        Some(path) => RenameSettings::load(path)?,
        None => RenameSettings::default(),
    };

    // 显式给出的命令行根目录优先于规则文件
    let roots_are_default = opts.roots.len() == 1 && opts.roots[0] == Path::new(".");
    if settings.roots.is_empty() || !roots_are_default {
        settings.roots = opts.roots.clone();
    }

    let make_spec = |target: &str, text: &str| {
        if opts.regex {
            PatternSpec::regex(target, text)
        } else {
            PatternSpec::literal(target, text)
        }
    };

    for target in &opts.delete {
        settings.delete_patterns.push(make_spec(target, ""));
    }
    for pair in opts.replace.chunks(2) {
        if let [target, text] = pair {
            settings.replace_patterns.push(make_spec(target, text));
        }
    }

    if opts.include_hidden {
        settings.include_hidden = true;
    }
    if opts.include_dirs {
        settings.include_directories = true;
    }
    if opts.exclude_files {
        settings.include_files = false;
    }
    if opts.no_recurse {
        settings.recursive = false;
    }
    if opts.filter.is_some() {
        settings.filter_glob = opts.filter.clone();
    }
    if opts.ignore_ext.is_some() {
        settings.ignore_extensions = opts.ignore_ext.clone();
    }
    if opts.rename_ext {
        settings.rename_extension = true;
    }

    if settings.has_no_patterns() {
        return Err(RenkitError::InvalidArgument(
            "no delete or replace patterns given (use --delete/--replace or --rules)".to_string(),
        ));
    }

    Ok(settings)
}

/// 配置全局 rayon 线程池
pub fn init_thread_pool(jobs: usize) {
    let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok();
}

/// 当前阶段进度条的挂载点
pub struct ProgressSlot {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressSlot {
    /// 切换当前阶段的进度条（None 表示无进度展示）
    pub fn set(&self, bar: Option<ProgressBar>) {
        *self.bar.lock().unwrap() = bar;
    }
}

/// 终端事件 sink：消息即时打印（挂起进度条避免串行），
/// 进度事件驱动当前挂载的进度条。
pub fn terminal_sink() -> (EventSink, Arc<ProgressSlot>) {
    let slot = Arc::new(ProgressSlot {
        bar: Mutex::new(None),
    });
    let shared = slot.clone();

    let sink: EventSink = Box::new(move |event| match event {
        EngineEvent::Progress(progress) => {
            if let Some(bar) = shared.bar.lock().unwrap().as_ref() {
                if bar.length().is_some() {
                    bar.set_position(progress.count as u64);
                }
                bar.set_message(progress.message);
            }
        }
        EngineEvent::Message(message) => {
            let text = if message.body.is_empty() {
                message.head.clone()
            } else {
                format!("{}: {}", message.head, message.body)
            };
            let print = move || match message.level {
                MessageLevel::Info => output::print_info(&text),
                MessageLevel::Alert => output::print_warning(&text),
                MessageLevel::Error => output::print_error(&text),
            };
            let guard = shared.bar.lock().unwrap();
            match guard.as_ref() {
                Some(bar) => bar.suspend(print),
                None => print(),
            }
        }
    });

    (sink, slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScanOpts;
    use std::path::PathBuf;

    fn opts() -> ScanOpts {
        ScanOpts {
            roots: vec![PathBuf::from(".")],
            rules: None,
            delete: Vec::new(),
            replace: Vec::new(),
            regex: false,
            include_hidden: false,
            include_dirs: false,
            exclude_files: false,
            no_recurse: false,
            filter: None,
            ignore_ext: None,
            rename_ext: false,
            jobs: 0,
        }
    }

    #[test]
    fn test_build_settings_from_cli_patterns() {
        let mut opts = opts();
        opts.delete = vec![" - Copy".to_string()];
        opts.replace = vec!["IMG".to_string(), "photo".to_string()];
        opts.regex = false;

        let settings = build_settings(&opts).unwrap();
        assert_eq!(settings.delete_patterns.len(), 1);
        assert_eq!(settings.replace_patterns.len(), 1);
        assert_eq!(settings.replace_patterns[0].target, "IMG");
        assert_eq!(settings.replace_patterns[0].replacement, "photo");
        assert_eq!(settings.roots, vec![PathBuf::from(".")]);
    }

    #[test]
    fn test_build_settings_requires_patterns() {
        assert!(matches!(
            build_settings(&opts()),
            Err(RenkitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_build_settings_flags() {
        let mut opts = opts();
        opts.delete = vec!["x".to_string()];
        opts.include_dirs = true;
        opts.no_recurse = true;
        opts.rename_ext = true;
        opts.filter = Some("*.jpg".to_string());

        let settings = build_settings(&opts).unwrap();
        assert!(settings.include_directories);
        assert!(!settings.recursive);
        assert!(settings.rename_extension);
        assert_eq!(settings.filter_glob.as_deref(), Some("*.jpg"));
    }
}
