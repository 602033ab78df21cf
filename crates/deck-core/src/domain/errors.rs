//! Errors - エラー型と分類
//!
//! # 分類
//! - Network: Gateway の失敗（通信エラー、非 0 の code）→ 通知してリトライ可能な状態を残す
//! - Validation: 利用者の操作が前提を満たしていない（未編集の commit など）
//!
//! 古いレスポンスの破棄はエラーではないので、ここには現れません。

use thiserror::Error;

use super::ids::ProjectId;

/// ErrorKind は運用上の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
}

/// GatewayError は Gateway 実装が返す通信レベルの失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("gateway returned an unreadable response: {0}")]
    Decode(String),

    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

/// DeckError は view-model 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// サーバーが非 0 の code を返した
    #[error("{message}")]
    Rejected { code: i32, message: String },

    #[error("project {0} is not in the list")]
    UnknownProject(ProjectId),

    #[error("project {0} is not being edited")]
    NotEditing(ProjectId),

    #[error("no deletion is awaiting confirmation")]
    NoPendingDeletion,

    #[error("deletion of {0} is already in progress")]
    DeletionBusy(ProjectId),
}

impl DeckError {
    pub fn rejected(code: i32, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeckError::Gateway(_) | DeckError::Rejected { .. } => ErrorKind::Network,
            DeckError::UnknownProject(_)
            | DeckError::NotEditing(_)
            | DeckError::NoPendingDeletion
            | DeckError::DeletionBusy(_) => ErrorKind::Validation,
        }
    }

    /// 通知に出す文言（サーバーのメッセージをそのまま使う）
    pub fn user_message(&self) -> String {
        match self {
            DeckError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            DeckError::Rejected { code, .. } => format!("request failed (code {code})"),
            other => other.to_string(),
        }
    }
}
