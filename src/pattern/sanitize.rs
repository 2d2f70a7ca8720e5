//! # 非法文件名策略
//!
//! 链式变换结束后对输出名做合法性检查：非法字符、保留设备名、
//! 尾随点/空格。违规一律以 `_` 修复，属可恢复告警，绝不报错。
//!
//! ## 依赖关系
//! - 被 `pattern/chain.rs` 调用
//! - 策略常量对测试公开

use once_cell::sync::Lazy;
use regex::Regex;

/// 非法文件名字符类（控制字符与 Windows 保留符号）
pub static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\x00-\x1f<>:"/\\|?*]"#).expect("invalid-char class"));

/// 保留设备名（整组件命中即违规）
pub const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "CLOCK$", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6",
    "COM7", "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8",
    "LPT9",
];

/// 清洗输出名。返回修复后的名称与违规描述列表（空表示无违规）。
pub fn sanitize_name(name: &str) -> (String, Vec<String>) {
    let mut violations = Vec::new();
    let mut result = name.to_string();

    let replaced = INVALID_CHARS.replace_all(&result, "_");
    if replaced != result {
        violations.push(format!(
            "invalid characters replaced with '_' in \"{}\"",
            name
        ));
        result = replaced.into_owned();
    }

    // 保留设备名：首个点之前的组件命中即违规，追加 '_' 使其失效
    let stem_len = result.find('.').unwrap_or(result.len());
    let stem_upper = result[..stem_len].to_uppercase();
    if RESERVED_NAMES.contains(&stem_upper.as_str()) {
        violations.push(format!("reserved device name \"{}\"", &result[..stem_len]));
        result.insert(stem_len, '_');
    }

    // 尾随点与空格逐个替换为 '_'
    let trimmed_len = result.trim_end_matches(['.', ' ']).len();
    if trimmed_len < result.len() {
        violations.push(format!("trailing dot/space in \"{}\"", name));
        let tail = result.len() - trimmed_len;
        result.truncate(trimmed_len);
        result.push_str(&"_".repeat(tail));
    }

    (result, violations)
}
