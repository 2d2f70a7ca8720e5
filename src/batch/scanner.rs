//! # 目标扫描器
//!
//! 按设置枚举根目录下的重命名目标，采集时间戳元数据，
//! 并把结果按“深路径在前”排序，保证顺序提交时先改子项
//! 再改祖先目录。
//!
//! ## 功能
//! - 隐藏项/文件/目录/递归开关
//! - 文件名 glob 过滤与忽略扩展名正则
//! - 每扫描 256 个条目上报一次进度并检查取消
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 做文件名匹配

use crate::error::{RenkitError, Result};
use crate::models::{
    CancellationToken, EngineEvent, EventSink, FileEntry, ProgressInfo, RenameSettings,
};

use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// 扫描阶段的进度/取消采样间隔。
/// 取消延迟以该间隔为上界，循环内没有更细的抢占。
pub const SCAN_PROGRESS_INTERVAL: usize = 256;

/// 文件名是否为隐藏项（点开头）
fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// 扫描所有根目录，返回排序后的目标条目。
/// 取消时返回 `OperationCanceled`，部分结果整体丢弃。
pub fn scan(
    settings: &RenameSettings,
    cancel: &CancellationToken,
    sink: &EventSink,
) -> Result<Vec<FileEntry>> {
    let ignore_extensions = match &settings.ignore_extensions {
        Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
            RenkitError::InvalidArgument(format!("invalid ignore-extension regex: {}", e))
        })?),
        None => None,
    };

    let filter_glob = match &settings.filter_glob {
        Some(pattern) => Some(glob::Pattern::new(pattern).map_err(|e| {
            RenkitError::InvalidArgument(format!("invalid filter glob '{}': {}", pattern, e))
        })?),
        None => None,
    };

    let mut entries = Vec::new();
    let mut scanned = 0usize;

    for root in &settings.roots {
        if !root.exists() {
            return Err(RenkitError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }

        let max_depth = if settings.recursive { usize::MAX } else { 1 };
        let include_hidden = settings.include_hidden;

        // 根目录本身（depth 0）不受隐藏过滤影响
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(move |e| {
                e.depth() == 0 || include_hidden || !is_hidden_name(e.file_name())
            })
            .filter_map(|e| e.ok());

        for dir_entry in walker {
            scanned += 1;
            if scanned % SCAN_PROGRESS_INTERVAL == 0 {
                if cancel.is_cancelled() {
                    return Err(RenkitError::OperationCanceled);
                }
                sink(EngineEvent::Progress(ProgressInfo {
                    count: scanned,
                    message: dir_entry.path().display().to_string(),
                }));
            }

            let is_dir = dir_entry.file_type().is_dir();
            if is_dir && !settings.include_directories {
                continue;
            }
            if !is_dir && !settings.include_files {
                continue;
            }

            if !is_dir {
                if let Some(pattern) = &filter_glob {
                    let name = dir_entry.file_name().to_string_lossy();
                    if !pattern.matches(&name) {
                        continue;
                    }
                }
                if let Some(ignore) = &ignore_extensions {
                    if let Some(ext) = extension_of(dir_entry.path()) {
                        if ignore.is_match(&ext) {
                            continue;
                        }
                    }
                }
            }

            let metadata = match dir_entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            entries.push(FileEntry::new(dir_entry.path().to_path_buf(), &metadata));
        }
    }

    // 深路径在前；同深度按路径排序保证确定性
    entries.sort_by(|a, b| {
        let depth_a = a.input_path.components().count();
        let depth_b = b.input_path.components().count();
        depth_b
            .cmp(&depth_a)
            .then_with(|| a.input_path.cmp(&b.input_path))
    });

    Ok(entries)
}

/// 小写扩展名（不含点）
fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}
