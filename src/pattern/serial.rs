//! # 连续编号变换
//!
//! 解析 `$n<start,step,000,r,i>` 的参数并基于批次快照计算每个
//! 条目的编号：`number = index * step + start`，按零填充宽度格式化。
//!
//! ## 参数
//! - 首个整数为 start（缺省 1），第二个整数为 step（缺省 1）
//! - 连续 `0` 串的长度即零填充宽度
//! - `r` 在每个父目录内重新从 start 编号
//! - `i` 反转（过滤后的）路径顺序
//!
//! ## 依赖关系
//! - 被 `pattern/compiler.rs` 调用
//! - 快照由 `batch/controller.rs` 在并行分发前构建（只读）

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 连续编号参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialParams {
    pub start: i64,
    pub step: i64,
    pub pad_width: usize,
    pub directory_reset: bool,
    pub reverse_order: bool,
}

impl Default for SerialParams {
    fn default() -> Self {
        Self {
            start: 1,
            step: 1,
            pad_width: 0,
            directory_reset: false,
            reverse_order: false,
        }
    }
}

impl SerialParams {
    /// 解析 `<>` 内逗号分隔的参数串。无法识别的参数被忽略。
    pub fn parse(params: &str) -> Self {
        let mut result = Self::default();
        let mut ints_seen = 0;

        for part in params.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part {
                "r" => result.directory_reset = true,
                "i" => result.reverse_order = true,
                _ if part.chars().all(|c| c == '0') => result.pad_width = part.len(),
                _ => {
                    if let Ok(value) = part.parse::<i64>() {
                        match ints_seen {
                            0 => result.start = value,
                            1 => result.step = value,
                            _ => {}
                        }
                        ints_seen += 1;
                    }
                }
            }
        }

        result
    }

    /// 由（过滤、可能反转后的）位置计算并格式化编号
    pub fn format_number(&self, index: usize) -> String {
        let number = index as i64 * self.step + self.start;
        if self.pad_width > 0 {
            format!("{:0width$}", number, width = self.pad_width)
        } else {
            number.to_string()
        }
    }
}

/// 批次路径快照：并行替换阶段的只读全局顺序。
///
/// 路径列表已按“深路径在前”预排序；每目录分组在构建时
/// 一次性物化，使每个文件的编号解析为 O(1)。
#[derive(Debug, Default)]
pub struct BatchSnapshot {
    paths: Vec<PathBuf>,
    index_of: HashMap<PathBuf, usize>,
    by_parent: HashMap<PathBuf, Vec<usize>>,
}

impl BatchSnapshot {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let mut index_of = HashMap::with_capacity(paths.len());
        let mut by_parent: HashMap<PathBuf, Vec<usize>> = HashMap::new();

        for (i, path) in paths.iter().enumerate() {
            index_of.insert(path.clone(), i);
            let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            by_parent.entry(parent).or_default().push(i);
        }

        Self {
            paths,
            index_of,
            by_parent,
        }
    }

    /// 当前路径在（过滤、反转后）处理列表中的位置
    pub fn serial_index(&self, path: &Path, params: &SerialParams) -> Option<usize> {
        let global = *self.index_of.get(path)?;

        if params.directory_reset {
            let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            let group = self.by_parent.get(&parent)?;
            // 分组按构建顺序递增，可二分定位
            let pos = group.binary_search(&global).ok()?;
            Some(if params.reverse_order {
                group.len() - 1 - pos
            } else {
                pos
            })
        } else {
            Some(if params.reverse_order {
                self.paths.len() - 1 - global
            } else {
                global
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(paths: &[&str]) -> BatchSnapshot {
        BatchSnapshot::new(paths.iter().map(PathBuf::from).collect())
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(SerialParams::parse(""), SerialParams::default());
        let p = SerialParams::parse("10,2");
        assert_eq!(p.start, 10);
        assert_eq!(p.step, 2);
        assert_eq!(p.pad_width, 0);
    }

    #[test]
    fn test_parse_pad_and_flags() {
        let p = SerialParams::parse("5,10,000,r,i");
        assert_eq!(p.start, 5);
        assert_eq!(p.step, 10);
        assert_eq!(p.pad_width, 3);
        assert!(p.directory_reset);
        assert!(p.reverse_order);
    }

    #[test]
    fn test_format_number() {
        let p = SerialParams::parse("1,1,000");
        assert_eq!(p.format_number(0), "001");
        assert_eq!(p.format_number(41), "042");

        let p = SerialParams::parse("100,50");
        assert_eq!(p.format_number(2), "200");
    }

    #[test]
    fn test_sequential_numbering() {
        let snap = snapshot(&["/d/A", "/d/B", "/d/C"]);
        let p = SerialParams::default();
        let numbers: Vec<String> = ["/d/A", "/d/B", "/d/C"]
            .iter()
            .map(|path| {
                let i = snap.serial_index(Path::new(path), &p).unwrap();
                p.format_number(i)
            })
            .collect();
        assert_eq!(numbers, ["1", "2", "3"]);
    }

    #[test]
    fn test_reverse_numbering() {
        let snap = snapshot(&["/d/A", "/d/B", "/d/C"]);
        let p = SerialParams::parse("1,1,i");
        let numbers: Vec<String> = ["/d/A", "/d/B", "/d/C"]
            .iter()
            .map(|path| {
                let i = snap.serial_index(Path::new(path), &p).unwrap();
                p.format_number(i)
            })
            .collect();
        assert_eq!(numbers, ["3", "2", "1"]);
    }

    #[test]
    fn test_directory_reset_numbering() {
        let snap = snapshot(&["/a/one", "/a/two", "/b/three", "/b/four", "/b/five"]);
        let p = SerialParams::parse("1,1,r");

        let index = |path: &str| snap.serial_index(Path::new(path), &p).unwrap();
        assert_eq!(p.format_number(index("/a/one")), "1");
        assert_eq!(p.format_number(index("/a/two")), "2");
        // 编号在新目录内重新开始
        assert_eq!(p.format_number(index("/b/three")), "1");
        assert_eq!(p.format_number(index("/b/five")), "3");
    }

    #[test]
    fn test_unknown_path_is_none() {
        let snap = snapshot(&["/d/A"]);
        assert_eq!(
            snap.serial_index(Path::new("/d/missing"), &SerialParams::default()),
            None
        );
    }
}
