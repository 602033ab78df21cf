//! Domain identifiers (strongly-typed IDs).
//!
//! # Phantom Type パターン
//! Gateway が返す ID は不透明な文字列です。`Id<T>` で文字列を包み、
//! `T` を PhantomData のマーカー型にすることで、
//! ProjectId と JobId をコンパイル時に区別します。
//!
//! ## 不透明性
//! - 中身の形式（ULID かどうか、プレフィックスの有無）には依存しない
//! - 比較・ハッシュ・表示のみを提供
//! - 新規発行（`mint`）は in-memory 実装や IdGenerator からのみ使う

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// `mint` で新しい ID を発行するときのプレフィックス（"project-", "job-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let project_id = ProjectId::new("p-001");
/// let job_id = JobId::new("p-001");
/// // 中身が同じでも project_id と job_id は異なる型なので、混同できない
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Gateway から受け取った文字列をそのまま ID として扱う
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// ULID から新しい ID を発行（例: `project-01HV...`）
    pub fn mint(ulid: Ulid) -> Self {
        Self::new(format!("{}{}", T::prefix(), ulid.to_string().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Project のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Project {}

impl IdMarker for Project {
    fn prefix() -> &'static str {
        "project-"
    }
}

/// Job のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {}

impl IdMarker for Job {
    fn prefix() -> &'static str {
        "job-"
    }
}

// ========================================
// Type Alias（使いやすさのため）
// ========================================

/// Identifier of a Project (immutable once created).
pub type ProjectId = Id<Project>;

/// Identifier of a Job run inside a project.
pub type JobId = Id<Job>;
