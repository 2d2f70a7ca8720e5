//! # 协作式取消令牌
//!
//! 扫描与提交循环按固定间隔轮询此令牌；取消延迟受采样间隔约束，
//! 没有抢占。
//!
//! ## 依赖关系
//! - 被 `batch/scanner.rs`, `batch/controller.rs` 轮询
//! - 由 `commands/` 创建并传入

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可克隆的取消令牌，跨线程共享同一取消标记
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消。幂等。
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }
}
