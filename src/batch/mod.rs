//! # 批处理模块
//!
//! 扫描 → 变换 → 提交的批量重命名编排。
//!
//! ## 功能
//! - 目录扫描与目标收集（walkdir）
//! - 并行链式变换与冲突检测
//! - 可取消的提交阶段与 CSV 审计日志
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `pattern/` 与 `models/`
//! - 使用 `rayon` 进行并行处理

pub mod audit;
pub mod conflict;
pub mod controller;
pub mod fsops;
pub mod scanner;

pub use controller::{BatchController, BatchState, RenameSummary, ReplaceSummary};
