//! # 时间戳格式翻译
//!
//! 时间标记参数使用 `yyyy-MM-dd` 风格的格式词汇，
//! 在求值前翻译为 `chrono` 的格式说明符。
//!
//! ## 依赖关系
//! - 被 `pattern/compiler.rs` 使用
//! - 使用 `chrono` 做实际格式化

use chrono::{DateTime, Local};

/// 时间标记缺省格式
pub const DEFAULT_TIME_FORMAT: &str = "yyyy-MM-dd";

/// 支持的格式单词与 chrono 说明符对应表（长词优先）
const FORMAT_WORDS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

/// 把 `yyyy-MM-dd` 风格格式串翻译为 chrono 格式串。
/// 未识别的字符原样透传，`%` 被转义。
pub fn to_chrono_format(fmt: &str) -> String {
    let mut out = String::with_capacity(fmt.len() * 2);
    let mut rest = fmt;

    'outer: while !rest.is_empty() {
        for (word, spec) in FORMAT_WORDS {
            if rest.starts_with(word) {
                out.push_str(spec);
                rest = &rest[word.len()..];
                continue 'outer;
            }
        }
        let c = rest.chars().next().unwrap();
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// 按给定格式词汇格式化时间戳
pub fn format_time(t: DateTime<Local>, fmt: &str) -> String {
    t.format(&to_chrono_format(fmt)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap()
    }

    #[test]
    fn test_translate_default_format() {
        assert_eq!(to_chrono_format(DEFAULT_TIME_FORMAT), "%Y-%m-%d");
    }

    #[test]
    fn test_translate_time_words() {
        assert_eq!(to_chrono_format("yyyyMMdd_HHmmss"), "%Y%m%d_%H%M%S");
        assert_eq!(to_chrono_format("yy-MM"), "%y-%m");
    }

    #[test]
    fn test_passthrough_and_escape() {
        assert_eq!(to_chrono_format("at yyyy!"), "at %Y!");
        assert_eq!(to_chrono_format("100%"), "100%%");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(sample_time(), "yyyy-MM-dd"), "2023-04-05");
        assert_eq!(format_time(sample_time(), "yyyyMMdd_HHmmss"), "20230405_060708");
    }
}
