//! # 模式编译器与标记解析
//!
//! 把 (目标, 替换文本, 正则开关) 三元组编译为变换器。
//! 字面量模式先经 `regex::escape` 转义，只作为精确子串匹配；
//! 非法正则不产生变换器，仅记录 debug 日志。
//!
//! 替换文本按固定优先级嗅探特殊标记：`$d`（未被 `$` 转义）、
//! `$n<>`、`$t<>`、`$u<>`；无标记即字面量变体。上下文相关变体
//! 在逐文件求值时把解析出的字面值替换进标记位置并重新编译，
//! 递归委托给剩余文本，捕获组引用因此仍指向原目标匹配。
//!
//! ## 依赖关系
//! - 被 `pattern/chain.rs` 使用
//! - 使用 `pattern/serial.rs`, `pattern/timefmt.rs`, `pattern/escape.rs`

use crate::models::PatternSpec;
use crate::pattern::serial::SerialParams;
use crate::pattern::{escape, timefmt, RenameContext};

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// 时间标记参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParams {
    pub format: String,
    pub use_creation: bool,
}

impl TimeParams {
    fn parse(params: &str) -> Self {
        let mut format = timefmt::DEFAULT_TIME_FORMAT.to_string();
        let mut use_creation = false;
        for part in params.split(',') {
            let part = part.trim();
            match part {
                "" => {}
                "c" => use_creation = true,
                _ => format = part.to_string(),
            }
        }
        Self {
            format,
            use_creation,
        }
    }
}

/// 变换器变体（文本嗅探一次，之后按标签分派）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// 纯字面量/正则替换
    Literal,
    /// `$d` 父目录名
    DirectoryName,
    /// `$n<>` 连续编号
    SerialNumber(SerialParams),
    /// `$t<>` 创建/修改时间
    Timestamp(TimeParams),
    /// `$u<>` 修改时间
    UpdateTimestamp(TimeParams),
}

/// 标记种类（检测与解析共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenTag {
    Dir,
    Serial,
    Time,
    Update,
}

static DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$d").expect("token regex"));
static SERIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$n(?:<([^>]*)>)?").expect("token regex"));
static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$t(?:<([^>]*)>)?").expect("token regex"));
static UPDATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$u(?:<([^>]*)>)?").expect("token regex"));

fn token_regex(tag: TokenTag) -> &'static Regex {
    match tag {
        TokenTag::Dir => &DIR_RE,
        TokenTag::Serial => &SERIAL_RE,
        TokenTag::Time => &TIME_RE,
        TokenTag::Update => &UPDATE_RE,
    }
}

struct FoundToken {
    span: Range<usize>,
    params: String,
}

/// 查找首个未被 `$` 转义的标记出现位置
fn find_token(text: &str, tag: TokenTag) -> Option<FoundToken> {
    for caps in token_regex(tag).captures_iter(text) {
        let whole = caps.get(0).expect("group 0");
        if whole.start() > 0 && text.as_bytes()[whole.start() - 1] == b'$' {
            continue;
        }
        return Some(FoundToken {
            span: whole.range(),
            params: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        });
    }
    None
}

/// 按固定优先级嗅探替换文本，选择变换器变体
pub fn detect_kind(replacement: &str) -> PatternKind {
    if find_token(replacement, TokenTag::Dir).is_some() {
        return PatternKind::DirectoryName;
    }
    if let Some(token) = find_token(replacement, TokenTag::Serial) {
        return PatternKind::SerialNumber(SerialParams::parse(&token.params));
    }
    if let Some(token) = find_token(replacement, TokenTag::Time) {
        return PatternKind::Timestamp(TimeParams::parse(&token.params));
    }
    if let Some(token) = find_token(replacement, TokenTag::Update) {
        let mut params = TimeParams::parse(&token.params);
        params.use_creation = false;
        return PatternKind::UpdateTimestamp(params);
    }
    PatternKind::Literal
}

/// 编译后的单条变换器
#[derive(Debug, Clone)]
pub struct Transformer {
    matcher: Regex,
    replacement: String,
    kind: PatternKind,
}

impl Transformer {
    /// 编译用户模式。目标为空或正则非法时不产生变换器。
    pub fn compile(spec: &PatternSpec) -> Option<Self> {
        if spec.target.is_empty() {
            tracing::debug!("dropping pattern with empty target");
            return None;
        }

        let target = if spec.regex_mode {
            spec.target.clone()
        } else {
            regex::escape(&spec.target)
        };

        let matcher = match Regex::new(&target) {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::debug!(pattern = %spec.target, %err, "dropping invalid pattern");
                return None;
            }
        };

        Some(Self {
            matcher,
            kind: detect_kind(&spec.replacement),
            replacement: spec.replacement.clone(),
        })
    }

    /// 对一个名称应用变换，标记按当前文件上下文解析
    pub fn apply(&self, name: &str, ctx: &RenameContext) -> String {
        match &self.kind {
            PatternKind::Literal => self.substitute(name),
            PatternKind::DirectoryName => {
                let value = ctx.parent_name();
                self.resolve_token(TokenTag::Dir, &value, name, ctx)
            }
            PatternKind::SerialNumber(params) => {
                let value = ctx
                    .snapshot
                    .serial_index(ctx.path, params)
                    .map(|i| params.format_number(i))
                    .unwrap_or_default();
                self.resolve_token(TokenTag::Serial, &value, name, ctx)
            }
            PatternKind::Timestamp(params) => {
                let time = if params.use_creation {
                    ctx.created.unwrap_or(ctx.modified)
                } else {
                    ctx.modified
                };
                let value = timefmt::format_time(time, &params.format);
                self.resolve_token(TokenTag::Time, &value, name, ctx)
            }
            PatternKind::UpdateTimestamp(params) => {
                let value = timefmt::format_time(ctx.modified, &params.format);
                self.resolve_token(TokenTag::Update, &value, name, ctx)
            }
        }
    }

    /// 把解析出的字面值替换进首个标记位置，重新嗅探剩余文本
    /// 并递归委托。值内的 `$` 先转义，替换展开后还原为字面量。
    fn resolve_token(&self, tag: TokenTag, value: &str, name: &str, ctx: &RenameContext) -> String {
        let Some(found) = find_token(&self.replacement, tag) else {
            return self.substitute(name);
        };

        let mut resolved = String::with_capacity(self.replacement.len() + value.len());
        resolved.push_str(&self.replacement[..found.span.start]);
        resolved.push_str(&value.replace('$', "$$"));
        resolved.push_str(&self.replacement[found.span.end..]);

        let next = Self {
            matcher: self.matcher.clone(),
            kind: detect_kind(&resolved),
            replacement: resolved,
        };
        next.apply(name, ctx)
    }

    /// 字面量/正则替换，带转义求值器支持
    fn substitute(&self, name: &str) -> String {
        match escape::find_escape(&self.replacement) {
            Some(esc) => self
                .matcher
                .replace_all(name, |caps: &regex::Captures| {
                    let group = caps.get(esc.group).map_or("", |m| m.as_str());
                    let folded = (esc.fold)(group).replace('$', "$$");

                    let mut template = String::with_capacity(self.replacement.len());
                    template.push_str(&self.replacement[..esc.span.start]);
                    template.push_str(&folded);
                    template.push_str(&self.replacement[esc.span.end..]);

                    let mut out = String::new();
                    caps.expand(&template, &mut out);
                    out
                })
                .into_owned(),
            None => self
                .matcher
                .replace_all(name, self.replacement.as_str())
                .into_owned(),
        }
    }
}
