//! Status - ジョブ状態の表示用正規化
//!
//! Gateway のジョブ状態文字列（大文字小文字は不定）を、
//! バッジ表示用の小さな enum に写像します。
//! 未知の値はエラーにせず `None`（中立表示）にします。

use serde::{Deserialize, Serialize};

/// BadgeStatus は表示上の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeStatus {
    InProgress,
    Error,
    Success,
    Warning,
}

impl BadgeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeStatus::InProgress => "in-progress",
            BadgeStatus::Error => "error",
            BadgeStatus::Success => "success",
            BadgeStatus::Warning => "warning",
        }
    }
}

/// ジョブ状態文字列を BadgeStatus に写像
///
/// | gateway   | badge       |
/// |-----------|-------------|
/// | running   | in-progress |
/// | failed    | error       |
/// | succeed   | success     |
/// | stopped   | warning     |
/// | その他    | None        |
pub fn map_status(status: &str) -> Option<BadgeStatus> {
    match status.to_ascii_lowercase().as_str() {
        "running" => Some(BadgeStatus::InProgress),
        "failed" => Some(BadgeStatus::Error),
        "succeed" => Some(BadgeStatus::Success),
        "stopped" => Some(BadgeStatus::Warning),
        _ => None,
    }
}
