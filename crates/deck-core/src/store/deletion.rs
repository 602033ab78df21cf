//! DeleteConfirmation - 削除確認ダイアログの一時状態
//!
//! # 状態遷移
//! - Idle（ダイアログなし）→ ConfirmOpen → Idle（キャンセル）
//! - ConfirmOpen → Deleting → Idle（完了）
//! - Deleting → ConfirmOpen（失敗時、リトライのため開いたまま）
//!
//! 確認ボタンは入力がプロジェクト名と完全一致（大文字小文字も区別）したときだけ有効。
//! 名前が未設定のプロジェクトは一致する入力がないので、確認できない。
//! 一覧（collection）には一切書き込みません。

use serde::Serialize;

use crate::domain::ProjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePhase {
    ConfirmOpen,
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmation {
    project_id: ProjectId,
    guard: Option<String>,
    input: String,
    phase: DeletePhase,
}

impl DeleteConfirmation {
    /// ダイアログを開く。guard は開いた時点のプロジェクト名
    pub fn open(project_id: ProjectId, guard: Option<String>) -> Self {
        Self {
            project_id,
            guard,
            input: String::new(),
            phase: DeletePhase::ConfirmOpen,
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> DeletePhase {
        self.phase
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// キー入力ごとに再評価される「確認ボタンが押せるか」
    pub fn can_confirm(&self) -> bool {
        self.phase == DeletePhase::ConfirmOpen && self.guard.as_deref() == Some(self.input.as_str())
    }

    /// Deleting へ。押せない状態なら false（何もしない）
    pub fn begin_deleting(&mut self) -> bool {
        if !self.can_confirm() {
            return false;
        }
        self.phase = DeletePhase::Deleting;
        true
    }

    pub fn reopen(&mut self) {
        self.phase = DeletePhase::ConfirmOpen;
    }
}
