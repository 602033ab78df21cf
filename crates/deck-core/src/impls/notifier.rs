//! Notifier の実装
//!
//! - **TracingNotifier**: 通知を tracing のログとして出す
//! - **InMemoryNotifier**: 通知を溜めておき、描画側が `drain()` で取り出す

use std::sync::Mutex;

use crate::domain::{Notice, NoticeLevel};
use crate::ports::Notifier;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let key = notice.key.as_deref().unwrap_or("-");
        match notice.level {
            NoticeLevel::Error => tracing::warn!(key, message = %notice.message, "notice"),
            NoticeLevel::Dismiss => tracing::debug!(key, "notice dismissed"),
            NoticeLevel::Success | NoticeLevel::Loading => {
                tracing::info!(key, level = ?notice.level, message = %notice.message, "notice")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 溜まった通知をすべて取り出す
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }

    /// 取り出さずに覗く（テスト用）
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_buffer() {
        let notifier = InMemoryNotifier::new();
        notifier.notify(Notice::success("saved"));
        notifier.notify(Notice::error("boom"));

        assert_eq!(notifier.snapshot().len(), 2);
        let drained = notifier.drain();
        assert_eq!(drained[0], Notice::success("saved"));
        assert_eq!(drained[1].level, NoticeLevel::Error);
        assert!(notifier.drain().is_empty());
    }
}
