//! Filter - 一覧の絞り込み（検索・計算モード）
//!
//! 絞り込みは full list からの純粋な射影です。
//! 最後に指定された絞り込みが 1 つだけ有効（検索とモード選択は互いに上書き）。

use serde::{Deserialize, Serialize};

use crate::domain::{ComputeMode, Project};

/// ModeFilter は計算モードのセレクタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeFilter {
    #[default]
    All,
    Pipeline,
    Hub,
}

impl std::str::FromStr for ModeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ModeFilter::All),
            "pipeline" => Ok(ModeFilter::Pipeline),
            "hub" => Ok(ModeFilter::Hub),
            other => Err(format!("unknown compute mode filter: {other}")),
        }
    }
}

/// ActiveFilter は現在有効な絞り込み
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveFilter {
    #[default]
    None,
    /// 名前の部分一致（大文字小文字を区別）
    Search(String),
    Mode(ModeFilter),
}

impl ActiveFilter {
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            ActiveFilter::None | ActiveFilter::Mode(ModeFilter::All) => true,
            ActiveFilter::Search(text) => match project.project_name.as_deref() {
                // 名前のないプロジェクトは検索対象外
                None | Some("") => false,
                Some(name) => name.contains(text.as_str()),
            },
            ActiveFilter::Mode(ModeFilter::Pipeline) => {
                project.effective_mode() == ComputeMode::Pipeline
            }
            ActiveFilter::Mode(ModeFilter::Hub) => project.compute_mode == Some(ComputeMode::Hub),
        }
    }

    /// full list の順序を保ったまま射影
    pub fn apply(&self, full: &[Project]) -> Vec<Project> {
        full.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
