//! Project - 一覧の主役となるエンティティ
//!
//! # 設計原則
//! - `project_id` は作成後に変わらない
//! - それ以外の属性は Gateway の update を往復してのみ変わる
//! - 任意項目は `Option` で表現（古いプロジェクトには compute_mode がない）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProjectId;

/// ComputeMode はプロジェクトの計算モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeMode {
    Pipeline,
    Hub,
}

impl ComputeMode {
    /// タグ表示用のラベル
    pub fn label(self) -> &'static str {
        match self {
            ComputeMode::Pipeline => "Pipeline",
            ComputeMode::Hub => "Hub",
        }
    }
}

/// 参加している計算ノード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub node_name: String,
}

impl Node {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
        }
    }
}

/// Project は Gateway が返すプロジェクト 1 件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub compute_mode: Option<ComputeMode>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub graph_count: u32,
    #[serde(default)]
    pub job_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(project_id: ProjectId, project_name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            project_id,
            project_name: Some(project_name.into()),
            description: None,
            compute_mode: None,
            nodes: Vec::new(),
            graph_count: 0,
            job_count: 0,
            created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mode(mut self, mode: ComputeMode) -> Self {
        self.compute_mode = Some(mode);
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    /// 名前（未設定なら空文字列）
    pub fn name(&self) -> &str {
        self.project_name.as_deref().unwrap_or("")
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// compute_mode が未設定のプロジェクトは pipeline として扱う
    pub fn effective_mode(&self) -> ComputeMode {
        self.compute_mode.unwrap_or(ComputeMode::Pipeline)
    }

    /// 「訓練に入る」ボタンの遷移先
    pub fn training_route(&self) -> String {
        format!("/dag?projectId={}", self.project_id)
    }
}

/// ProjectDescriptor は新規作成ダイアログから渡される入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub compute_mode: Option<ComputeMode>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            compute_mode: None,
            nodes: Vec::new(),
        }
    }
}

/// UpdateProjectRequest は名前変更時に Gateway へ送る内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
}

/// Gateway の作成時刻を `YYYY-MM-DD HH:MM:SS` で表示
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
