//! EditState - プロジェクト名のインライン編集
//!
//! # 状態
//! - Viewing: エントリなし（既定）
//! - Editing: エントリあり、draft を保持
//! - Editing + committing: update 呼び出し中
//!
//! 「編集フラグ」と「draft」を 1 つの HashMap にまとめることで、
//! フラグが false なのに draft だけ残る、という状態を作れないようにしています。
//! 複数プロジェクトの同時編集は許可（相互排他はしない）。

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::ProjectId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditEntry {
    pub draft: String,
    pub committing: bool,
}

/// commit 開始の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommitStart {
    Started(String),
    /// blur と Enter が続けて来たときなど
    AlreadyCommitting,
    #[default]
    NotEditing,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EditState {
    entries: HashMap<ProjectId, EditEntry>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self, project_id: &ProjectId) -> bool {
        self.entries.contains_key(project_id)
    }

    pub fn draft(&self, project_id: &ProjectId) -> Option<&str> {
        self.entries.get(project_id).map(|e| e.draft.as_str())
    }

    pub fn entry(&self, project_id: &ProjectId) -> Option<&EditEntry> {
        self.entries.get(project_id)
    }

    pub fn editing_count(&self) -> usize {
        self.entries.len()
    }

    /// 編集開始。既に編集中なら draft をそのまま残して false
    pub fn begin(&mut self, project_id: ProjectId, current_name: &str) -> bool {
        if self.entries.contains_key(&project_id) {
            return false;
        }
        self.entries.insert(
            project_id,
            EditEntry {
                draft: current_name.to_string(),
                committing: false,
            },
        );
        true
    }

    /// draft を置き換える。`max_len` 文字を超えた分は切り捨て
    pub fn set_draft(&mut self, project_id: &ProjectId, text: &str, max_len: usize) -> bool {
        match self.entries.get_mut(project_id) {
            Some(entry) => {
                entry.draft = truncate_chars(text, max_len);
                true
            }
            None => false,
        }
    }

    pub fn start_commit(&mut self, project_id: &ProjectId) -> CommitStart {
        match self.entries.get_mut(project_id) {
            None => CommitStart::NotEditing,
            Some(entry) if entry.committing => CommitStart::AlreadyCommitting,
            Some(entry) => {
                entry.committing = true;
                CommitStart::Started(entry.draft.clone())
            }
        }
    }

    /// 成功なら Viewing に戻す（エントリ削除）
    pub fn finish_commit(&mut self, project_id: &ProjectId) {
        self.entries.remove(project_id);
    }

    /// プロジェクトが消えたときなど、編集状態ごと捨てる
    pub fn discard(&mut self, project_id: &ProjectId) -> bool {
        self.entries.remove(project_id).is_some()
    }

    /// 失敗なら Editing に留まる。draft は巻き戻さない
    pub fn abort_commit(&mut self, project_id: &ProjectId) {
        if let Some(entry) = self.entries.get_mut(project_id) {
            entry.committing = false;
        }
    }
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}
