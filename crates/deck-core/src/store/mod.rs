//! Store module: 画面状態の部品（一覧、絞り込み、遅延スロット、編集、削除確認）。
//!
//! ここの型はすべて同期的な状態機械で、ネットワークには触れません。
//! 非同期の呼び出しと組み合わせるのは `app::view_model` の役割です。

mod collection;
mod deletion;
mod edit;
mod filter;
mod slot;

pub use collection::ProjectCollection;
pub use deletion::{DeleteConfirmation, DeletePhase};
pub use edit::{CommitStart, EditEntry, EditState};
pub use filter::{ActiveFilter, ModeFilter};
pub use slot::ResourceSlot;

/// RequestToken は非同期リクエストの世代番号
///
/// 発行のたびに単調増加し、結果はスロットの現在値と一致したときだけ反映されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}
