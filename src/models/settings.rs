//! # 重命名设置模型
//!
//! 有序的删除/替换模式列表与扫描开关，可从 JSON 规则文件反序列化。
//!
//! ## 功能
//! - 删除模式（替换文本固定为空）与替换模式分列，按序应用
//! - 扫描范围开关：隐藏项、目录、文件、递归
//! - 可选的文件名 glob 过滤与忽略扩展名正则
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/` 使用
//! - 使用 `serde` / `serde_json` 读取规则文件

use crate::error::{RenkitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 单条用户模式：目标、替换文本、是否正则模式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    pub target: String,
    pub replacement: String,
    pub regex_mode: bool,
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self {
            target: String::new(),
            replacement: String::new(),
            regex_mode: false,
        }
    }
}

impl PatternSpec {
    /// 字面量模式
    pub fn literal(target: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            replacement: replacement.into(),
            regex_mode: false,
        }
    }

    /// 正则模式
    pub fn regex(target: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            replacement: replacement.into(),
            regex_mode: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// 批量重命名设置（设置协作方）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameSettings {
    /// 扫描根目录列表
    pub roots: Vec<PathBuf>,
    /// 删除模式（按序应用，替换文本为空）
    pub delete_patterns: Vec<PatternSpec>,
    /// 替换模式（按序应用，位于删除模式之后）
    pub replace_patterns: Vec<PatternSpec>,
    /// 是否包含隐藏项
    pub include_hidden: bool,
    /// 是否包含文件
    #[serde(default = "default_true")]
    pub include_files: bool,
    /// 是否包含目录
    pub include_directories: bool,
    /// 是否递归扫描子目录
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// 文件名 glob 过滤（如 "*.jpg"）
    pub filter_glob: Option<String>,
    /// 忽略的扩展名正则（匹配者不列为目标）
    pub ignore_extensions: Option<String>,
    /// 是否对扩展名也应用模式（目录始终使用完整名称）
    pub rename_extension: bool,
    /// 是否在提交后写出 CSV 审计日志
    pub audit_log: bool,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            delete_patterns: Vec::new(),
            replace_patterns: Vec::new(),
            include_hidden: false,
            include_files: true,
            include_directories: false,
            recursive: true,
            filter_glob: None,
            ignore_extensions: None,
            rename_extension: false,
            audit_log: false,
        }
    }
}

impl RenameSettings {
    /// 从 JSON 规则文件加载设置
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RenkitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| RenkitError::RulesParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 是否未配置任何模式
    pub fn has_no_patterns(&self) -> bool {
        self.delete_patterns.is_empty() && self.replace_patterns.is_empty()
    }
}
