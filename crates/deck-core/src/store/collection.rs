//! ProjectCollection - full list と display list の保持
//!
//! # 不変条件
//! - display list は常に full list の部分列（相対順序を保つ）
//! - display list は full list か絞り込みが変わったときに同期的に再計算する
//! - display list を直接編集する API は存在しない
//!
//! # refresh の順序
//! refresh ごとに RequestToken を発行し、最後に**発行**された refresh だけが
//! 結果を反映できます（last-issued-wins）。古い refresh が遅れて届いても無視します。

use serde::Serialize;

use super::RequestToken;
use super::filter::{ActiveFilter, ModeFilter};
use crate::domain::{Project, ProjectId};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectCollection {
    full: Vec<Project>,
    display: Vec<Project>,
    filter: ActiveFilter,
    loading: bool,
    #[serde(skip)]
    current: RequestToken,
}

impl ProjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full(&self) -> &[Project] {
        &self.full
    }

    pub fn display(&self) -> &[Project] {
        &self.display
    }

    pub fn filter(&self) -> &ActiveFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn find(&self, project_id: &ProjectId) -> Option<&Project> {
        self.full.iter().find(|p| &p.project_id == project_id)
    }

    /// refresh 開始: 新しい token を発行して loading にする
    pub fn begin_refresh(&mut self) -> RequestToken {
        self.current = self.current.next();
        self.loading = true;
        self.current
    }

    /// refresh 結果の反映。token が古ければ何もせず false
    pub fn complete_refresh(&mut self, token: RequestToken, projects: Vec<Project>) -> bool {
        if token != self.current {
            return false;
        }
        self.full = projects;
        self.loading = false;
        self.recompute();
        true
    }

    /// refresh 失敗。最新の refresh なら loading だけ解除する
    pub fn fail_refresh(&mut self, token: RequestToken) -> bool {
        if token != self.current {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn search(&mut self, text: &str) {
        self.set_filter(ActiveFilter::Search(text.to_string()));
    }

    pub fn filter_by_mode(&mut self, mode: ModeFilter) {
        self.set_filter(ActiveFilter::Mode(mode));
    }

    fn set_filter(&mut self, filter: ActiveFilter) {
        self.filter = filter;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.display = self.filter.apply(&self.full);
    }
}
