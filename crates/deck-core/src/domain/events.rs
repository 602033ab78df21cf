//! Events - 利用者向けの一時的な通知
//!
//! view-model は描画層を呼び出さないので、
//! 「更新中…」「削除しました」などの表示は Notice として Notifier port に渡します。

use serde::{Deserialize, Serialize};

/// NoticeLevel は通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    /// key 付きで表示し、同じ key の Dismiss で消す
    Loading,
    Dismiss,
}

/// Notice は Notifier に渡す 1 件の通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub key: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            key: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            key: None,
            message: message.into(),
        }
    }

    pub fn loading(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Loading,
            key: Some(key.into()),
            message: message.into(),
        }
    }

    pub fn dismiss(key: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Dismiss,
            key: Some(key.into()),
            message: String::new(),
        }
    }
}
