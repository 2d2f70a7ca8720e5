//! # 重命名条目模型
//!
//! 表示扫描阶段发现的单个文件或目录，以及其预览输出名与提交状态。
//!
//! ## 生命周期
//! - 扫描时创建，记录路径、类型与时间戳
//! - 替换阶段只改写 `output_name`（预览，不落盘）
//! - 提交阶段把 `state` 从 `None` 迁移到 `Renamed` 或 `FailedToRename`
//! - 提交后若底层路径不复存在（祖先目录被改名），条目被剪除
//!
//! ## 依赖关系
//! - 被 `pattern/chain.rs`, `batch/` 使用
//! - 使用 `chrono` 表示时间戳

use chrono::{DateTime, Local};
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// 提交阶段的重命名状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameState {
    /// 尚未提交
    None,
    /// 已成功重命名
    Renamed,
    /// 重命名失败（如共享冲突）
    FailedToRename,
}

impl RenameState {
    /// 审计日志中的状态列取值
    pub fn as_str(&self) -> &'static str {
        match self {
            RenameState::None => "None",
            RenameState::Renamed => "Renamed",
            RenameState::FailedToRename => "FailedToRename",
        }
    }
}

/// 单个重命名目标条目
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// 输入路径（提交成功后更新为新路径）
    pub input_path: PathBuf,
    /// 预览输出名（仅文件名部分）
    pub output_name: String,
    /// 是否为目录
    pub is_directory: bool,
    /// 创建时间（文件系统不支持时为 None）
    pub created: Option<DateTime<Local>>,
    /// 最后写入时间
    pub modified: DateTime<Local>,
    /// 提交状态
    pub state: RenameState,
    /// 输出路径是否与其他条目冲突
    pub is_conflicted: bool,
}

impl FileEntry {
    /// 从扫描到的路径与元数据创建条目
    pub fn new(path: PathBuf, metadata: &Metadata) -> Self {
        let created = metadata.created().ok().map(DateTime::<Local>::from);
        let modified = metadata
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());
        let output_name = file_name_of(&path);

        Self {
            is_directory: metadata.is_dir(),
            input_path: path,
            output_name,
            created,
            modified,
            state: RenameState::None,
            is_conflicted: false,
        }
    }

    /// 输入文件名（不含目录部分）
    pub fn input_name(&self) -> String {
        file_name_of(&self.input_path)
    }

    /// 预览输出的完整路径
    pub fn output_path(&self) -> PathBuf {
        match self.input_path.parent() {
            Some(parent) => parent.join(&self.output_name),
            None => PathBuf::from(&self.output_name),
        }
    }

    /// 输出名是否与输入名不同
    pub fn is_changed(&self) -> bool {
        self.input_name() != self.output_name
    }
}

/// 提取路径的最后一个组件
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
