//! # 全角/半角与浊音正规化
//!
//! 为替换文本的转义求值器提供字符形态折叠：
//! `\h` 全角转半角、`\f` 半角转全角、`\n` 结合符正规化。
//!
//! ## 覆盖范围
//! - ASCII 区块 U+0021..U+007E 与全角对应区 U+FF01..U+FF5E、全角空格
//! - 片假名与半角片假名 U+FF61..U+FF9F，含浊音/半浊音组合
//! - 结合用浊点 U+3099/U+309A 合成到基字，拉丁结合符 U+0300..U+036F 剥除
//!
//! ## 依赖关系
//! - 被 `pattern/escape.rs` 使用

/// 可加浊点的假名（浊音字为基字码位 +1）
const DAKUTEN_BASES: &str =
    "かきくけこさしすせそたちつてとはひふへほカキクケコサシスセソタチツテトハヒフヘホ";

/// 可加半浊点的假名（半浊音字为基字码位 +2）
const HANDAKUTEN_BASES: &str = "はひふへほハヒフヘホ";

/// 半角片假名与全角基字的对应表
const KANA_HALF_TO_FULL: &[(char, char)] = &[
    ('｡', '。'),
    ('｢', '「'),
    ('｣', '」'),
    ('､', '、'),
    ('･', '・'),
    ('ｦ', 'ヲ'),
    ('ｧ', 'ァ'),
    ('ｨ', 'ィ'),
    ('ｩ', 'ゥ'),
    ('ｪ', 'ェ'),
    ('ｫ', 'ォ'),
    ('ｬ', 'ャ'),
    ('ｭ', 'ュ'),
    ('ｮ', 'ョ'),
    ('ｯ', 'ッ'),
    ('ｰ', 'ー'),
    ('ｱ', 'ア'),
    ('ｲ', 'イ'),
    ('ｳ', 'ウ'),
    ('ｴ', 'エ'),
    ('ｵ', 'オ'),
    ('ｶ', 'カ'),
    ('ｷ', 'キ'),
    ('ｸ', 'ク'),
    ('ｹ', 'ケ'),
    ('ｺ', 'コ'),
    ('ｻ', 'サ'),
    ('ｼ', 'シ'),
    ('ｽ', 'ス'),
    ('ｾ', 'セ'),
    ('ｿ', 'ソ'),
    ('ﾀ', 'タ'),
    ('ﾁ', 'チ'),
    ('ﾂ', 'ツ'),
    ('ﾃ', 'テ'),
    ('ﾄ', 'ト'),
    ('ﾅ', 'ナ'),
    ('ﾆ', 'ニ'),
    ('ﾇ', 'ヌ'),
    ('ﾈ', 'ネ'),
    ('ﾉ', 'ノ'),
    ('ﾊ', 'ハ'),
    ('ﾋ', 'ヒ'),
    ('ﾌ', 'フ'),
    ('ﾍ', 'ヘ'),
    ('ﾎ', 'ホ'),
    ('ﾏ', 'マ'),
    ('ﾐ', 'ミ'),
    ('ﾑ', 'ム'),
    ('ﾒ', 'メ'),
    ('ﾓ', 'モ'),
    ('ﾔ', 'ヤ'),
    ('ﾕ', 'ユ'),
    ('ﾖ', 'ヨ'),
    ('ﾗ', 'ラ'),
    ('ﾘ', 'リ'),
    ('ﾙ', 'ル'),
    ('ﾚ', 'レ'),
    ('ﾛ', 'ロ'),
    ('ﾜ', 'ワ'),
    ('ﾝ', 'ン'),
    ('ﾞ', '゛'),
    ('ﾟ', '゜'),
];

/// 把浊点/半浊点合成到基字上。不可合成时返回 None。
fn compose_voiced(base: char, mark: char) -> Option<char> {
    match mark {
        'ﾞ' | '゛' | '\u{3099}' => {
            if base == 'う' {
                Some('ゔ')
            } else if base == 'ウ' {
                Some('ヴ')
            } else if DAKUTEN_BASES.contains(base) {
                char::from_u32(base as u32 + 1)
            } else {
                None
            }
        }
        'ﾟ' | '゜' | '\u{309A}' => {
            if HANDAKUTEN_BASES.contains(base) {
                char::from_u32(base as u32 + 2)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// 把全角浊音字拆成基字加浊点标记
fn decompose_voiced(c: char) -> Option<(char, char)> {
    if c == 'ヴ' {
        return Some(('ウ', 'ﾞ'));
    }
    let prev2 = char::from_u32(c as u32 - 2);
    if let Some(base) = prev2 {
        if HANDAKUTEN_BASES.contains(base) {
            return Some((base, 'ﾟ'));
        }
    }
    let prev1 = char::from_u32(c as u32 - 1);
    if let Some(base) = prev1 {
        if DAKUTEN_BASES.contains(base) {
            return Some((base, 'ﾞ'));
        }
    }
    None
}

fn full_kana_to_half(c: char) -> Option<char> {
    KANA_HALF_TO_FULL
        .iter()
        .find(|(_, full)| *full == c)
        .map(|(half, _)| *half)
}

fn half_kana_to_full(c: char) -> Option<char> {
    KANA_HALF_TO_FULL
        .iter()
        .find(|(half, _)| *half == c)
        .map(|(_, full)| *full)
}

/// 全角转半角
pub fn to_half_width(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{3000}' => out.push(' '),
            '\u{FF01}'..='\u{FF5E}' => {
                // 全角 ASCII 区块与半角等距偏移
                if let Some(half) = char::from_u32(c as u32 - 0xFEE0) {
                    out.push(half);
                } else {
                    out.push(c);
                }
            }
            _ => {
                if let Some((base, mark)) = decompose_voiced(c) {
                    if let Some(half) = full_kana_to_half(base) {
                        out.push(half);
                        out.push(mark);
                        continue;
                    }
                }
                match full_kana_to_half(c) {
                    Some(half) => out.push(half),
                    None => out.push(c),
                }
            }
        }
    }
    out
}

/// 半角转全角
pub fn to_full_width(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        // 半角假名后跟浊点时优先合成
        if let Some(full) = half_kana_to_full(c) {
            if let Some(mark @ ('ﾞ' | 'ﾟ')) = next {
                if let Some(composed) = compose_voiced(full, mark) {
                    out.push(composed);
                    i += 2;
                    continue;
                }
            }
            out.push(full);
            i += 1;
            continue;
        }

        match c {
            ' ' => out.push('\u{3000}'),
            '\u{0021}'..='\u{007E}' => {
                if let Some(full) = char::from_u32(c as u32 + 0xFEE0) {
                    out.push(full);
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// 结合符正规化：浊点合成到基字，拉丁结合符剥除
pub fn normalize_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{3099}' | '\u{309A}' => {
                if let Some(prev) = out.chars().last() {
                    if let Some(composed) = compose_voiced(prev, c) {
                        out.pop();
                        out.push(composed);
                        continue;
                    }
                }
                // 无法合成时转为独立浊点
                out.push(if c == '\u{3099}' { '゛' } else { '゜' });
            }
            '\u{0300}'..='\u{036F}' => {
                // 拉丁结合符直接剥除
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width_round() {
        assert_eq!(to_half_width("ＡＢＣ１２３！"), "ABC123!");
        assert_eq!(to_full_width("ABC123!"), "ＡＢＣ１２３！");
        assert_eq!(to_half_width("\u{3000}"), " ");
        assert_eq!(to_full_width(" "), "\u{3000}");
    }

    #[test]
    fn test_katakana_width() {
        assert_eq!(to_full_width("ｱｲｳｴｵ"), "アイウエオ");
        assert_eq!(to_half_width("アイウエオ"), "ｱｲｳｴｵ");
    }

    #[test]
    fn test_voiced_katakana_width() {
        assert_eq!(to_full_width("ｶﾞｷﾞﾊﾟｳﾞ"), "ガギパヴ");
        assert_eq!(to_half_width("ガギパヴ"), "ｶﾞｷﾞﾊﾟｳﾞ");
    }

    #[test]
    fn test_mixed_text_unchanged_parts() {
        assert_eq!(to_half_width("写真ＮＯ１"), "写真NO1");
        assert_eq!(to_full_width("写真NO1"), "写真ＮＯ１");
    }

    #[test]
    fn test_normalize_combining_voiced_mark() {
        // か + 結合浊点 -> が
        assert_eq!(normalize_diacritics("か\u{3099}"), "が");
        // ハ + 結合半浊点 -> パ
        assert_eq!(normalize_diacritics("ハ\u{309A}"), "パ");
    }

    #[test]
    fn test_normalize_strips_latin_combining_marks() {
        // e + 結合アキュート -> e
        assert_eq!(normalize_diacritics("Cafe\u{0301}"), "Cafe");
        assert_eq!(normalize_diacritics("plain"), "plain");
    }
}
