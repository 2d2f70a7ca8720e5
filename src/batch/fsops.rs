//! # 文件系统原语
//!
//! 提交阶段使用的重命名/移动操作与路径工具。
//! 大小写不敏感文件系统上的“仅大小写”重命名通过两步临时名完成。
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs`, `batch/audit.rs` 使用

use crate::error::{RenkitError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// 两个路径是否仅大小写不同
fn differs_only_in_case(from: &Path, to: &Path) -> bool {
    from != to && from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
}

/// 在目标旁生成一个未被占用的临时路径
fn temp_sibling(path: &Path) -> PathBuf {
    let mut counter = 0u32;
    loop {
        let candidate = path.with_file_name(format!(
            "{}.rk_tmp{}",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            counter
        ));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 重命名一个条目。
///
/// 仅大小写变化时走临时名两步；目标已存在时报错而不覆盖。
pub fn rename_entry(from: &Path, to: &Path) -> Result<()> {
    let map_err = |source: std::io::Error| RenkitError::RenameError {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    };

    if differs_only_in_case(from, to) {
        let temp = temp_sibling(to);
        fs::rename(from, &temp).map_err(map_err)?;
        return fs::rename(&temp, to).map_err(map_err);
    }

    if to.exists() {
        return Err(map_err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }

    fs::rename(from, to).map_err(map_err)
}

/// 一组路径的最浅公共祖先目录
pub fn common_ancestor(paths: &[PathBuf]) -> Option<PathBuf> {
    let first = paths.first()?;
    let mut ancestor: Vec<Component> = first.components().collect();

    for path in &paths[1..] {
        let components: Vec<Component> = path.components().collect();
        let shared = ancestor
            .iter()
            .zip(components.iter())
            .take_while(|(a, b)| a == b)
            .count();
        ancestor.truncate(shared);
        if ancestor.is_empty() {
            return None;
        }
    }

    Some(ancestor.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ancestor() {
        let paths = vec![
            PathBuf::from("/data/photos/2023/a.jpg"),
            PathBuf::from("/data/photos/2024/b.jpg"),
            PathBuf::from("/data/photos/c.jpg"),
        ];
        assert_eq!(common_ancestor(&paths), Some(PathBuf::from("/data/photos")));

        let single = vec![PathBuf::from("/data/x")];
        assert_eq!(common_ancestor(&single), Some(PathBuf::from("/data/x")));

        assert_eq!(common_ancestor(&[]), None);
    }

    #[test]
    fn test_rename_entry_basic() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("old.txt");
        let to = dir.path().join("new.txt");
        fs::write(&from, "x").unwrap();

        rename_entry(&from, &to).unwrap();
        assert!(!from.exists());
        assert!(to.exists());
    }

    #[test]
    fn test_rename_entry_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        fs::write(&from, "a").unwrap();
        fs::write(&to, "b").unwrap();

        assert!(rename_entry(&from, &to).is_err());
        assert!(from.exists());
    }

    #[test]
    fn test_case_only_rename_two_step() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("readme.TXT");
        let to = dir.path().join("README.txt");
        fs::write(&from, "x").unwrap();

        rename_entry(&from, &to).unwrap();
        assert!(to.exists());
        // 临时名不应残留
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("rk_tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_differs_only_in_case() {
        assert!(differs_only_in_case(
            Path::new("/d/A.txt"),
            Path::new("/d/a.TXT")
        ));
        assert!(!differs_only_in_case(
            Path::new("/d/a.txt"),
            Path::new("/d/a.txt")
        ));
        assert!(!differs_only_in_case(
            Path::new("/d/a.txt"),
            Path::new("/d/b.txt")
        ));
    }
}
