//! ResourceSlot - 遅延読み込みされるサブリソースの置き場
//!
//! pipelines 用と jobs 用に 1 つずつ、view-model 全体で共有します
//! （プロジェクトごとではない）。
//!
//! # 学習ポイント
//! - 「開いているプロジェクトが同じか」という場当たり的な判定を、
//!   単調増加する RequestToken の一致判定に置き換える
//! - open / close のたびに token を進めるので、
//!   それ以前に発行されたリクエストの結果は必ず捨てられる
//!
//! # 状態遷移
//! - Closed → (open) → Loading(target) → (complete) → Loaded(target)
//! - 任意の状態 → (open 別プロジェクト) → Loading(新 target)
//! - 任意の状態 → (close) → Closed

use serde::Serialize;

use super::RequestToken;
use crate::domain::ProjectId;

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSlot<T> {
    target: Option<ProjectId>,
    items: Vec<T>,
    loading: bool,
    #[serde(skip)]
    current: RequestToken,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self {
            target: None,
            items: Vec::new(),
            loading: false,
            current: RequestToken::default(),
        }
    }
}

impl<T> ResourceSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// いま開いているプロジェクト
    pub fn target(&self) -> Option<&ProjectId> {
        self.target.as_ref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 開く: 前の内容を捨てて loading にし、このリクエストの token を返す
    pub fn open(&mut self, project_id: ProjectId) -> RequestToken {
        self.current = self.current.next();
        self.target = Some(project_id);
        self.items.clear();
        self.loading = true;
        self.current
    }

    /// 結果の反映。token が現在のものでなければ捨てて false
    pub fn complete(&mut self, token: RequestToken, items: Vec<T>) -> bool {
        if token != self.current {
            return false;
        }
        self.items = items;
        self.loading = false;
        true
    }

    /// 取得失敗。現在のリクエストなら loading を解除し、内容は空のまま
    pub fn fail(&mut self, token: RequestToken) -> bool {
        if token != self.current {
            return false;
        }
        self.items.clear();
        self.loading = false;
        true
    }

    /// 閉じる: 読み込み中かどうかに関係なく内容を捨て、進行中のリクエストを無効化
    ///
    /// 見た目が変わったときだけ true（通知の要否に使う）
    pub fn close(&mut self) -> bool {
        self.current = self.current.next();
        let changed = self.target.is_some() || !self.items.is_empty() || self.loading;
        self.target = None;
        self.items.clear();
        self.loading = false;
        changed
    }

    /// `project_id` を開いているときだけ閉じる（削除されたプロジェクトの後始末）
    pub fn close_if_target(&mut self, project_id: &ProjectId) -> bool {
        if self.target.as_ref() == Some(project_id) {
            self.close()
        } else {
            false
        }
    }
}
