//! InMemoryProjectGateway - 開発用の Gateway
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による状態の共有（ロック中に await しない）
//! - Clock / IdGenerator port の注入で ID と作成時刻を差し替え可能にする
//! - 人工的な遅延（latency）で、画面側の読み込み中表示や競合を再現する
//!
//! 業務エラーは本物のサーバーと同じく `ApiStatus.code != 0` で返します。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ApiStatus, GatewayError, JobSummary, Node, Page, PageRequest, PipelineSummary, Project,
    ProjectDescriptor, ProjectId, UpdateProjectRequest,
};
use crate::ports::{Clock, IdGenerator, ProjectGateway, SystemClock, UlidGenerator};

pub const CODE_INVALID_ARGUMENT: i32 = 400;
pub const CODE_NOT_FOUND: i32 = 404;

const NAME_MAX_LEN: usize = 32;

#[derive(Default)]
struct GatewayState {
    /// 作成順（Gateway が返す順序）
    projects: Vec<Project>,
    pipelines: HashMap<ProjectId, Vec<PipelineSummary>>,
    /// 新しい順
    jobs: HashMap<ProjectId, Vec<JobSummary>>,
}

impl GatewayState {
    fn position(&self, project_id: &ProjectId) -> Option<usize> {
        self.projects.iter().position(|p| &p.project_id == project_id)
    }
}

pub struct InMemoryProjectGateway {
    state: Arc<Mutex<GatewayState>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: Duration,
}

impl InMemoryProjectGateway {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + Clone + 'static>(clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(GatewayState::default())),
            ids: Arc::new(UlidGenerator::new(clock.clone())),
            clock: Arc::new(clock),
            latency: Duration::ZERO,
        }
    }

    /// すべての呼び出しの前に `latency` だけ待つ
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 既存プロジェクトをそのまま登録（テスト・デモ用）
    pub async fn insert_project(&self, project: Project) {
        let mut state = self.state.lock().await;
        state.projects.push(project);
    }

    pub async fn add_pipeline(&self, project_id: &ProjectId, name: &str) {
        let mut state = self.state.lock().await;
        state
            .pipelines
            .entry(project_id.clone())
            .or_default()
            .push(PipelineSummary::new(name));
        if let Some(idx) = state.position(project_id) {
            state.projects[idx].graph_count += 1;
        }
    }

    pub async fn add_job(&self, project_id: &ProjectId, status: &str) -> JobSummary {
        let job = JobSummary {
            job_id: self.ids.generate_job_id(),
            status: status.to_string(),
            created_at: self.clock.now(),
        };
        let mut state = self.state.lock().await;
        state
            .jobs
            .entry(project_id.clone())
            .or_default()
            .insert(0, job.clone());
        if let Some(idx) = state.position(project_id) {
            state.projects[idx].job_count += 1;
        }
        job
    }

    /// デモ用に `count` 件のプロジェクトを作る
    pub async fn seed_demo(&self, count: usize) -> Vec<ProjectId> {
        const STATUSES: [&str; 4] = ["RUNNING", "SUCCEED", "FAILED", "STOPPED"];

        let mut created = Vec::with_capacity(count);
        for i in 1..=count {
            let mut descriptor = ProjectDescriptor::new(format!("Project {i}"));
            descriptor.description = Some(format!("demo project #{i}"));
            descriptor.nodes = vec![Node::new("alice"), Node::new("bob")];
            let project = self.insert_descriptor(descriptor).await;

            for g in 1..=i.min(3) {
                self.add_pipeline(&project.project_id, &format!("graph-{g}")).await;
            }
            for status in STATUSES.iter().take(i % STATUSES.len() + 1) {
                self.add_job(&project.project_id, status).await;
            }
            created.push(project.project_id);
        }
        created
    }

    async fn insert_descriptor(&self, descriptor: ProjectDescriptor) -> Project {
        let project = Project {
            project_id: self.ids.generate_project_id(),
            project_name: Some(descriptor.name),
            description: descriptor.description,
            compute_mode: descriptor.compute_mode,
            nodes: descriptor.nodes,
            graph_count: 0,
            job_count: 0,
            created_at: self.clock.now(),
        };
        let mut state = self.state.lock().await;
        state.projects.push(project.clone());
        project
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryProjectGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Option<ApiStatus> {
    if name.trim().is_empty() {
        return Some(ApiStatus::failed(CODE_INVALID_ARGUMENT, "project name must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Some(ApiStatus::failed(
            CODE_INVALID_ARGUMENT,
            format!("project name must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    None
}

#[async_trait]
impl ProjectGateway for InMemoryProjectGateway {
    async fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state.projects.clone())
    }

    async fn create_project(&self, descriptor: ProjectDescriptor) -> Result<Project, GatewayError> {
        self.simulate_latency().await;
        if let Some(status) = validate_name(&descriptor.name) {
            return Err(GatewayError::Rejected(status.message().to_string()));
        }
        Ok(self.insert_descriptor(descriptor).await)
    }

    async fn update_project(&self, request: UpdateProjectRequest) -> Result<ApiStatus, GatewayError> {
        self.simulate_latency().await;
        if let Some(status) = validate_name(&request.name) {
            return Ok(status);
        }
        let mut state = self.state.lock().await;
        let Some(idx) = state.position(&request.project_id) else {
            return Ok(ApiStatus::failed(CODE_NOT_FOUND, "project not found"));
        };
        let project = &mut state.projects[idx];
        project.project_name = Some(request.name);
        project.description = request.description;
        Ok(ApiStatus::ok())
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<ApiStatus, GatewayError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let Some(idx) = state.position(project_id) else {
            return Ok(ApiStatus::failed(CODE_NOT_FOUND, "project not found"));
        };
        state.projects.remove(idx);
        state.pipelines.remove(project_id);
        state.jobs.remove(project_id);
        Ok(ApiStatus::ok())
    }

    async fn list_pipelines(&self, project_id: &ProjectId) -> Result<Vec<PipelineSummary>, GatewayError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state.pipelines.get(project_id).cloned().unwrap_or_default())
    }

    async fn list_jobs(
        &self,
        project_id: &ProjectId,
        page: PageRequest,
    ) -> Result<Page<JobSummary>, GatewayError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        let jobs = state.jobs.get(project_id).map(Vec::as_slice).unwrap_or_default();
        let size = page.size as usize;
        let skip = (page.page.saturating_sub(1) as usize).saturating_mul(size);
        let data = jobs.iter().skip(skip).take(size).cloned().collect();
        Ok(Page::new(data, jobs.len() as u64))
    }
}
