//! GatedGateway - 応答の順序をテストから操作できる Gateway（テスト専用）
//!
//! InMemoryProjectGateway を包み、キーごとのゲート（Semaphore）で応答を止めます。
//! `hold_*` で止め、`release_*` で 1 回分だけ通します。
//! 呼び出し内容も記録するので「update が 1 回だけ呼ばれた」などを検証できます。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::inmem_gateway::InMemoryProjectGateway;
use crate::domain::{
    ApiStatus, GatewayError, JobSummary, Page, PageRequest, PipelineSummary, Project,
    ProjectDescriptor, ProjectId, UpdateProjectRequest,
};
use crate::ports::ProjectGateway;

const PROJECTS_GATE: &str = "projects";

fn pipelines_gate(project_id: &ProjectId) -> String {
    format!("pipelines:{project_id}")
}

fn jobs_gate(project_id: &ProjectId) -> String {
    format!("jobs:{project_id}")
}

#[derive(Default)]
pub struct GatedGateway {
    pub inner: InMemoryProjectGateway,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    list_projects_calls: AtomicUsize,
    updates: Mutex<Vec<UpdateProjectRequest>>,
    deletes: Mutex<Vec<ProjectId>>,
    /// Some なら update/delete はこの結果を返す
    forced_status: Mutex<Option<ApiStatus>>,
    /// Some なら一覧・サブリソース取得はこのエラーを返す
    forced_error: Mutex<Option<GatewayError>>,
    /// 次の list_projects 1 回だけ、このスナップショットを返す
    scripted_lists: Mutex<Vec<Vec<Project>>>,
}

impl GatedGateway {
    pub fn new(inner: InMemoryProjectGateway) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn hold(&self, key: String) {
        self.gates
            .lock()
            .unwrap()
            .insert(key, Arc::new(Semaphore::new(0)));
    }

    fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(key) {
            gate.add_permits(1);
        }
    }

    async fn pass(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }

    pub fn hold_projects(&self) {
        self.hold(PROJECTS_GATE.to_string());
    }

    pub fn release_projects(&self) {
        self.release(PROJECTS_GATE);
    }

    pub fn hold_pipelines(&self, project_id: &ProjectId) {
        self.hold(pipelines_gate(project_id));
    }

    pub fn release_pipelines(&self, project_id: &ProjectId) {
        self.release(&pipelines_gate(project_id));
    }

    pub fn hold_jobs(&self, project_id: &ProjectId) {
        self.hold(jobs_gate(project_id));
    }

    pub fn release_jobs(&self, project_id: &ProjectId) {
        self.release(&jobs_gate(project_id));
    }

    pub fn force_status(&self, status: Option<ApiStatus>) {
        *self.forced_status.lock().unwrap() = status;
    }

    pub fn force_error(&self, error: Option<GatewayError>) {
        *self.forced_error.lock().unwrap() = error;
    }

    /// list_projects が順に返すスナップショットを積む（空になったら inner に戻る）
    pub fn script_list(&self, projects: Vec<Project>) {
        self.scripted_lists.lock().unwrap().push(projects);
    }

    pub fn list_projects_calls(&self) -> usize {
        self.list_projects_calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<UpdateProjectRequest> {
        self.updates.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<ProjectId> {
        self.deletes.lock().unwrap().clone()
    }

    fn forced_error(&self) -> Option<GatewayError> {
        self.forced_error.lock().unwrap().clone()
    }

    fn forced_status(&self) -> Option<ApiStatus> {
        self.forced_status.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectGateway for GatedGateway {
    async fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        self.list_projects_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = {
            let mut lists = self.scripted_lists.lock().unwrap();
            (!lists.is_empty()).then(|| lists.remove(0))
        };
        self.pass(PROJECTS_GATE).await;
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        match scripted {
            Some(projects) => Ok(projects),
            None => self.inner.list_projects().await,
        }
    }

    async fn create_project(&self, descriptor: ProjectDescriptor) -> Result<Project, GatewayError> {
        self.inner.create_project(descriptor).await
    }

    async fn update_project(&self, request: UpdateProjectRequest) -> Result<ApiStatus, GatewayError> {
        self.updates.lock().unwrap().push(request.clone());
        if let Some(status) = self.forced_status() {
            return Ok(status);
        }
        self.inner.update_project(request).await
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<ApiStatus, GatewayError> {
        self.deletes.lock().unwrap().push(project_id.clone());
        if let Some(status) = self.forced_status() {
            return Ok(status);
        }
        self.inner.delete_project(project_id).await
    }

    async fn list_pipelines(&self, project_id: &ProjectId) -> Result<Vec<PipelineSummary>, GatewayError> {
        self.pass(&pipelines_gate(project_id)).await;
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        self.inner.list_pipelines(project_id).await
    }

    async fn list_jobs(
        &self,
        project_id: &ProjectId,
        page: PageRequest,
    ) -> Result<Page<JobSummary>, GatewayError> {
        self.pass(&jobs_gate(project_id)).await;
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        self.inner.list_jobs(project_id, page).await
    }
}
