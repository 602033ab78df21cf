//! ProjectGateway port - リモート API の抽象化
//!
//! 通信方式（HTTP, gRPC など）は Gateway 実装が持ちます。
//! view-model はここに並んだ形だけを知っています。
//!
//! # 設計原則
//! - タイムアウト・リトライは Gateway 側の責務
//! - 通信失敗は `GatewayError`、サーバーの業務エラーは `ApiStatus.code != 0`
//! - キャンセルは提供しない（view-model は遅れた結果を無視する）

use async_trait::async_trait;

use crate::domain::{
    ApiStatus, GatewayError, JobSummary, Page, PageRequest, PipelineSummary, Project,
    ProjectDescriptor, ProjectId, UpdateProjectRequest,
};

#[async_trait]
pub trait ProjectGateway: Send + Sync {
    /// プロジェクト一覧（Gateway が返した順序のまま）
    async fn list_projects(&self) -> Result<Vec<Project>, GatewayError>;

    async fn create_project(&self, descriptor: ProjectDescriptor) -> Result<Project, GatewayError>;

    async fn update_project(&self, request: UpdateProjectRequest) -> Result<ApiStatus, GatewayError>;

    async fn delete_project(&self, project_id: &ProjectId) -> Result<ApiStatus, GatewayError>;

    async fn list_pipelines(&self, project_id: &ProjectId) -> Result<Vec<PipelineSummary>, GatewayError>;

    async fn list_jobs(
        &self,
        project_id: &ProjectId,
        page: PageRequest,
    ) -> Result<Page<JobSummary>, GatewayError>;
}
