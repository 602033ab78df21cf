//! Notifier port - 利用者向け通知の出口
//!
//! 描画層が実装します（トースト、ステータスバー、ログなど）。

use crate::domain::Notice;

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
