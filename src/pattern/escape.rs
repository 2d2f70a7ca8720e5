//! # 转义求值器
//!
//! 替换文本中的 `\u$1` 形式转义引用一个捕获组，并在替换时对该组
//! 的匹配文本应用大小写/字宽折叠。求值器表按固定顺序匹配，
//! 首个命中者生效；折叠在匹配回调中执行，而非静态字符串。
//!
//! ## 求值器
//! - `\u` 转大写、`\l` 转小写
//! - `\h` 全角转半角、`\f` 半角转全角
//! - `\n` 结合符正规化
//!
//! ## 依赖关系
//! - 被 `pattern/compiler.rs` 的替换阶段调用
//! - 使用 `pattern/charform.rs` 的折叠函数

use crate::pattern::charform;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

type FoldFn = fn(&str) -> String;

fn fold_upper(s: &str) -> String {
    s.to_uppercase()
}

fn fold_lower(s: &str) -> String {
    s.to_lowercase()
}

/// 固定顺序的 (检测正则, 折叠函数) 表
static EVALUATORS: Lazy<Vec<(Regex, FoldFn)>> = Lazy::new(|| {
    let table: &[(&str, FoldFn)] = &[
        (r"\\u\$(\d+)", fold_upper),
        (r"\\l\$(\d+)", fold_lower),
        (r"\\h\$(\d+)", charform::to_half_width as FoldFn),
        (r"\\f\$(\d+)", charform::to_full_width as FoldFn),
        (r"\\n\$(\d+)", charform::normalize_diacritics as FoldFn),
    ];
    table
        .iter()
        .map(|(pattern, fold)| (Regex::new(pattern).expect("escape evaluator regex"), *fold))
        .collect()
});

/// 替换文本中命中的转义引用
pub struct EscapeRef {
    /// 转义串在替换文本中的字节范围
    pub span: Range<usize>,
    /// 引用的捕获组序号
    pub group: usize,
    /// 应用于组匹配文本的折叠函数
    pub fold: FoldFn,
}

/// 按固定顺序查找首个命中的转义求值器
pub fn find_escape(replacement: &str) -> Option<EscapeRef> {
    for (pattern, fold) in EVALUATORS.iter() {
        if let Some(caps) = pattern.captures(replacement) {
            let whole = caps.get(0).expect("match always has group 0");
            let group = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .unwrap_or(0);
            return Some(EscapeRef {
                span: whole.range(),
                group,
                fold: *fold,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_escape() {
        assert!(find_escape("plain_$1").is_none());
    }

    #[test]
    fn test_uppercase_escape() {
        let esc = find_escape(r"pre_\u$2_post").unwrap();
        assert_eq!(esc.group, 2);
        assert_eq!((esc.fold)("abc"), "ABC");
        assert_eq!(&r"pre_\u$2_post"[esc.span.clone()], r"\u$2");
    }

    #[test]
    fn test_priority_order() {
        // \l 在文本中出现得更早，但 \u 在求值器表中优先
        let esc = find_escape(r"\l$1 then \u$2").unwrap();
        assert_eq!(esc.group, 2);
        assert_eq!((esc.fold)("x"), "X");
    }

    #[test]
    fn test_width_folds() {
        let esc = find_escape(r"\h$0").unwrap();
        assert_eq!((esc.fold)("ＡＢ"), "AB");

        let esc = find_escape(r"\f$0").unwrap();
        assert_eq!((esc.fold)("AB"), "ＡＢ");

        let esc = find_escape(r"\n$0").unwrap();
        assert_eq!((esc.fold)("か\u{3099}"), "が");
    }
}
