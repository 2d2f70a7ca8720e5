//! # 进度与消息通道模型
//!
//! 引擎通过调用方提供的回调（sink）上报进度与用户消息，
//! 自身不持有任何界面或调度器假设。
//!
//! ## 依赖关系
//! - 被 `batch/` 使用
//! - 被 `commands/` 消费（打印到终端 / 驱动进度条）

/// 用户消息级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// 提示信息
    Info,
    /// 需要注意但可恢复的告警
    Alert,
    /// 错误（不中止批处理）
    Error,
}

/// 面向用户的消息事件
#[derive(Debug, Clone)]
pub struct UserMessage {
    pub level: MessageLevel,
    /// 标题行
    pub head: String,
    /// 详情正文
    pub body: String,
}

impl UserMessage {
    pub fn info(head: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            head: head.into(),
            body: body.into(),
        }
    }

    pub fn alert(head: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Alert,
            head: head.into(),
            body: body.into(),
        }
    }

    pub fn error(head: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            head: head.into(),
            body: body.into(),
        }
    }
}

/// 进度事件：已处理数量与当前描述
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub count: usize,
    pub message: String,
}

/// 引擎对外事件
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Progress(ProgressInfo),
    Message(UserMessage),
}

/// 事件接收回调。调用方决定在哪个线程消费事件。
pub type EventSink = Box<dyn Fn(EngineEvent) + Send + Sync>;

/// 构造丢弃一切事件的 sink（测试与静默场景）
pub fn null_sink() -> EventSink {
    Box::new(|_| {})
}
