//! ViewState - 描画層が観測する状態のスナップショット
//!
//! view-model は `tokio::sync::watch` にこの値を持ち、書き込みのたびに購読者へ通知します。
//! 描画層は `subscribe()` で受け取った Receiver から読むだけで、直接書き換えません。

use serde::Serialize;

use crate::domain::{JobSummary, PipelineSummary, Project, ProjectId};
use crate::store::{DeleteConfirmation, EditState, ProjectCollection, ResourceSlot};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub projects: ProjectCollection,
    pub edits: EditState,
    pub pipelines: ResourceSlot<PipelineSummary>,
    pub jobs: ResourceSlot<JobSummary>,
    pub deletion: Option<DeleteConfirmation>,
    pub create_dialog_open: bool,
}

impl ViewState {
    /// 画面に並べる一覧
    pub fn display(&self) -> &[Project] {
        self.projects.display()
    }

    pub fn is_editing(&self, project_id: &ProjectId) -> bool {
        self.edits.is_editing(project_id)
    }

    pub fn can_confirm_delete(&self) -> bool {
        self.deletion.as_ref().is_some_and(DeleteConfirmation::can_confirm)
    }
}
