//! GuideTour port - 初回ガイドの完了状態

use serde::{Deserialize, Serialize};

/// TourKey はガイドの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TourKey {
    /// 最初のプロジェクトを作った直後に一覧で出すガイド
    ProjectListTour,
}

/// GuideTour はガイドを一度だけ表示するための記録
pub trait GuideTour: Send + Sync {
    fn is_finished(&self, key: TourKey) -> bool;

    fn finish(&self, key: TourKey);
}
