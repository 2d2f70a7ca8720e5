//! # 输出路径冲突检测
//!
//! 在整个批次的链式变换之后运行：对每个条目的输入路径和
//! （若不同的）输出路径建一张大小写不敏感的频次表，输出路径
//! 小写形式出现 ≥2 次的条目标记为冲突。
//!
//! 一次哈希表构建加每条目 O(1) 查询，整体摊还 O(N)；
//! 批次可达 10⁴–10⁵ 条目，不允许 O(N²) 重扫。
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 在每次变换后调用

use crate::models::FileEntry;
use std::collections::HashMap;
use std::path::Path;

/// 路径的大小写不敏感键
fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// 标记冲突条目并返回冲突数量
pub fn mark_conflicts(entries: &mut [FileEntry]) -> usize {
    let mut frequency: HashMap<String, usize> = HashMap::with_capacity(entries.len() * 2);

    for entry in entries.iter() {
        let input_key = path_key(&entry.input_path);
        let output_key = path_key(&entry.output_path());
        let same = input_key == output_key;

        *frequency.entry(input_key).or_insert(0) += 1;
        if !same {
            *frequency.entry(output_key).or_insert(0) += 1;
        }
    }

    let mut conflicted = 0;
    for entry in entries.iter_mut() {
        let count = frequency
            .get(&path_key(&entry.output_path()))
            .copied()
            .unwrap_or(0);
        entry.is_conflicted = count >= 2;
        if entry.is_conflicted {
            conflicted += 1;
        }
    }

    conflicted
}
