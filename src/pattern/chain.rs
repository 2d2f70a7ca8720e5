//! # 变换器链
//!
//! 对单个条目按序应用删除模式链（替换文本为空）与替换模式链。
//! 除非启用“重命名扩展名”，扩展名不参与变换；目录始终使用
//! 完整名称。链应用结束后执行非法文件名策略检查。
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 调用
//! - 使用 `pattern/compiler.rs`, `pattern/sanitize.rs`

use crate::models::PatternSpec;
use crate::pattern::compiler::Transformer;
use crate::pattern::{sanitize, RenameContext};

/// 链应用结果：输出名与策略违规描述
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub name: String,
    pub violations: Vec<String>,
}

/// 有序变换器链
#[derive(Debug, Default)]
pub struct TransformerChain {
    transformers: Vec<Transformer>,
    rename_extension: bool,
}

impl TransformerChain {
    /// 编译删除链与替换链。删除模式的替换文本强制为空；
    /// 编译失败的模式被丢弃（debug 日志），不产生错误。
    pub fn compile(
        deletes: &[PatternSpec],
        replaces: &[PatternSpec],
        rename_extension: bool,
    ) -> Self {
        let mut transformers = Vec::with_capacity(deletes.len() + replaces.len());

        for spec in deletes {
            let delete_spec = PatternSpec {
                target: spec.target.clone(),
                replacement: String::new(),
                regex_mode: spec.regex_mode,
            };
            if let Some(transformer) = Transformer::compile(&delete_spec) {
                transformers.push(transformer);
            }
        }
        for spec in replaces {
            if let Some(transformer) = Transformer::compile(spec) {
                transformers.push(transformer);
            }
        }

        Self {
            transformers,
            rename_extension,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// 对一个名称应用整条链并做合法性修复
    pub fn apply(&self, name: &str, ctx: &RenameContext) -> ChainOutcome {
        let (mut stem, ext) = if ctx.is_directory || self.rename_extension {
            (name.to_string(), None)
        } else {
            split_extension(name)
        };

        for transformer in &self.transformers {
            stem = transformer.apply(&stem, ctx);
        }

        let combined = match ext {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        };

        let (name, violations) = sanitize::sanitize_name(&combined);
        ChainOutcome { name, violations }
    }
}

/// 在最后一个点处拆出扩展名。隐藏文件名（点开头）不算扩展名。
fn split_extension(name: &str) -> (String, Option<String>) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => {
            (name[..pos].to_string(), Some(name[pos + 1..].to_string()))
        }
        _ => (name.to_string(), None),
    }
}
