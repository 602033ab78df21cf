//! ProjectListViewModel - 描画層が呼び出し・観測する唯一のオブジェクト
//!
//! # 学習ポイント
//! - `watch::Sender` を状態の置き場にする（書き込み = 通知）
//! - Gateway を await している間はロックを持たない（ほかの操作が割り込める）
//! - 遅れて届いた結果は RequestToken で判定して捨てる（キャンセルの代わり）
//!
//! # フロー
//! 1. 描画層が操作（refresh, search, open, edit, delete）を呼ぶ
//! 2. store の状態機械を同期的に進める（token 発行など）
//! 3. Gateway を await
//! 4. token が現在のものなら結果を反映、古ければ捨てる
//! 5. 成功した変更系（rename, delete, create）は refresh に合流する
//!
//! # 注意
//! `watch::Sender::borrow()` のガードを持ったまま書き込むとデッドロックするので、
//! 読み取りは必要な値を owned にして文の終わりでガードを落とす。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::ViewState;
use crate::config::ListConfig;
use crate::domain::{
    ApiStatus, DeckError, GatewayError, JobSummary, Notice, PageRequest, PipelineSummary, Project,
    ProjectDescriptor, ProjectId, UpdateProjectRequest,
};
use crate::ports::{GuideTour, Notifier, ProjectGateway, TourKey};
use crate::store::{CommitStart, DeleteConfirmation, DeletePhase, ModeFilter, RequestToken, ResourceSlot};

/// 非同期読み込みの結末
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// 別の open / close / refresh に追い越された
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Saved,
    /// 同じプロジェクトの commit が進行中（blur + Enter の二重発火）
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// 確認入力がプロジェクト名と一致していない（ボタン無効）
    Blocked,
}

#[derive(Default)]
enum ConfirmStart {
    #[default]
    NoDialog,
    Blocked,
    Started(ProjectId),
}

struct Inner {
    gateway: Arc<dyn ProjectGateway>,
    tour: Arc<dyn GuideTour>,
    notifier: Arc<dyn Notifier>,
    config: ListConfig,
    state: watch::Sender<ViewState>,
}

/// ProjectListViewModel は clone しても同じ状態を共有するハンドル
///
/// 描画層は操作を `tokio::spawn` で投げてもよい（割り込みは token で整合させる）。
#[derive(Clone)]
pub struct ProjectListViewModel {
    inner: Arc<Inner>,
}

fn pipelines_slot(state: &mut ViewState) -> &mut ResourceSlot<PipelineSummary> {
    &mut state.pipelines
}

fn jobs_slot(state: &mut ViewState) -> &mut ResourceSlot<JobSummary> {
    &mut state.jobs
}

fn check_status(result: Result<ApiStatus, GatewayError>) -> Result<(), DeckError> {
    let status = result?;
    if status.is_success() {
        Ok(())
    } else {
        Err(DeckError::rejected(status.code, status.message()))
    }
}

impl ProjectListViewModel {
    pub(crate) fn new(
        gateway: Arc<dyn ProjectGateway>,
        tour: Arc<dyn GuideTour>,
        notifier: Arc<dyn Notifier>,
        config: ListConfig,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            inner: Arc::new(Inner {
                gateway,
                tour,
                notifier,
                config,
                state,
            }),
        }
    }

    // ========================================
    // 観測
    // ========================================

    /// 書き込みのたびに通知される Receiver
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    /// 常に通知する書き込み
    fn write<R: Default>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut out = R::default();
        self.inner.state.send_modify(|state| out = f(state));
        out
    }

    /// `f` が true を返したときだけ通知する書き込み
    fn write_if(&self, f: impl FnOnce(&mut ViewState) -> bool) -> bool {
        self.inner.state.send_if_modified(f)
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    fn project_name(&self, project_id: &ProjectId) -> Result<String, DeckError> {
        self.inner
            .state
            .borrow()
            .projects
            .find(project_id)
            .map(|p| p.name().to_string())
            .ok_or_else(|| DeckError::UnknownProject(project_id.clone()))
    }

    // ========================================
    // 一覧（Project Collection Store）
    // ========================================

    /// Gateway から一覧を取り直し、現在の絞り込みを掛け直す
    ///
    /// 最後に発行された refresh だけが反映される。
    pub async fn refresh(&self) -> Result<LoadOutcome, DeckError> {
        let token = self.write(|s| s.projects.begin_refresh());
        match self.inner.gateway.list_projects().await {
            Ok(projects) => {
                let count = projects.len();
                if self.write_if(|s| s.projects.complete_refresh(token, projects)) {
                    debug!(count, token = token.get(), "project list refreshed");
                    Ok(LoadOutcome::Applied)
                } else {
                    debug!(token = token.get(), "discarding superseded project list");
                    Ok(LoadOutcome::Discarded)
                }
            }
            Err(error) => {
                if !self.write_if(|s| s.projects.fail_refresh(token)) {
                    debug!(token = token.get(), %error, "ignoring failure of superseded refresh");
                    return Ok(LoadOutcome::Discarded);
                }
                warn!(%error, "failed to load project list");
                self.notify(Notice::error(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// 名前の部分一致（大文字小文字を区別）で絞り込む。ネットワークには触れない
    pub fn search(&self, text: &str) {
        self.write(|s| s.projects.search(text));
    }

    pub fn filter_by_mode(&self, mode: ModeFilter) {
        self.write(|s| s.projects.filter_by_mode(mode));
    }

    // ========================================
    // 遅延サブリソース（Lazy Sub-Resource Loader）
    // ========================================

    pub async fn open_pipelines(&self, project_id: &ProjectId) -> Result<LoadOutcome, DeckError> {
        let token = self.write(|s| pipelines_slot(s).open(project_id.clone()));
        let result = self.inner.gateway.list_pipelines(project_id).await;
        self.settle(token, result, pipelines_slot, "pipelines", project_id)
    }

    /// 読み込み中かどうかに関係なく内容を捨てる。何もなければ通知もしない
    pub fn close_pipelines(&self) {
        self.write_if(|s| s.pipelines.close());
    }

    pub async fn open_jobs(&self, project_id: &ProjectId) -> Result<LoadOutcome, DeckError> {
        let token = self.write(|s| jobs_slot(s).open(project_id.clone()));
        let page = PageRequest::first(self.inner.config.recent_jobs_limit);
        let result = self
            .inner
            .gateway
            .list_jobs(project_id, page)
            .await
            .map(|page| page.data);
        self.settle(token, result, jobs_slot, "jobs", project_id)
    }

    pub fn close_jobs(&self) {
        self.write_if(|s| s.jobs.close());
    }

    fn settle<T>(
        &self,
        token: RequestToken,
        result: Result<Vec<T>, GatewayError>,
        slot: fn(&mut ViewState) -> &mut ResourceSlot<T>,
        resource: &'static str,
        project_id: &ProjectId,
    ) -> Result<LoadOutcome, DeckError> {
        match result {
            Ok(items) => {
                let count = items.len();
                if self.write_if(|s| slot(s).complete(token, items)) {
                    debug!(resource, project_id = %project_id, count, "sub-resource loaded");
                    Ok(LoadOutcome::Applied)
                } else {
                    debug!(resource, project_id = %project_id, token = token.get(), "discarding stale sub-resource response");
                    Ok(LoadOutcome::Discarded)
                }
            }
            Err(error) => {
                if !self.write_if(|s| slot(s).fail(token)) {
                    debug!(resource, project_id = %project_id, %error, "ignoring failure of stale sub-resource request");
                    return Ok(LoadOutcome::Discarded);
                }
                warn!(resource, project_id = %project_id, %error, "failed to load sub-resource");
                self.notify(Notice::error(error.to_string()));
                Err(error.into())
            }
        }
    }

    // ========================================
    // 名前のインライン編集（Inline Rename）
    // ========================================

    /// 編集開始。draft は現在の名前で初期化
    pub fn begin_edit(&self, project_id: &ProjectId) -> Result<(), DeckError> {
        let name = self.project_name(project_id)?;
        self.write_if(|s| s.edits.begin(project_id.clone(), &name));
        Ok(())
    }

    /// 入力欄の内容を draft に反映（最大文字数で切り詰め）
    pub fn set_draft(&self, project_id: &ProjectId, text: &str) -> Result<(), DeckError> {
        let max_len = self.inner.config.name_max_len;
        if self.write_if(|s| s.edits.set_draft(project_id, text, max_len)) {
            Ok(())
        } else {
            Err(DeckError::NotEditing(project_id.clone()))
        }
    }

    /// blur または Enter で呼ばれる。取り消しの経路はなく、常に保存を試みる
    ///
    /// - 成功: 一覧を refresh してから Viewing に戻る
    /// - 失敗: エラー通知を出して Editing のまま（draft も残る）
    pub async fn commit_edit(&self, project_id: &ProjectId) -> Result<CommitOutcome, DeckError> {
        let draft = match self.write(|s| s.edits.start_commit(project_id)) {
            CommitStart::Started(draft) => draft,
            CommitStart::AlreadyCommitting => return Ok(CommitOutcome::InFlight),
            CommitStart::NotEditing => return Err(DeckError::NotEditing(project_id.clone())),
        };
        let description = self
            .inner
            .state
            .borrow()
            .projects
            .find(project_id)
            .and_then(|p| p.description.clone());
        let request = UpdateProjectRequest {
            project_id: project_id.clone(),
            name: draft,
            description,
        };

        let key = project_id.to_string();
        self.notify(Notice::loading(key.as_str(), "Updating project..."));
        let result = check_status(self.inner.gateway.update_project(request).await);
        self.notify(Notice::dismiss(key.as_str()));

        match result {
            Ok(()) => {
                info!(project_id = %project_id, "project renamed");
                if let Err(error) = self.refresh().await {
                    debug!(%error, "refresh after rename failed");
                }
                self.write(|s| s.edits.finish_commit(project_id));
                Ok(CommitOutcome::Saved)
            }
            Err(error) => {
                warn!(project_id = %project_id, %error, "rename rejected");
                self.write(|s| s.edits.abort_commit(project_id));
                self.notify(Notice::error(error.user_message()));
                Err(error)
            }
        }
    }

    // ========================================
    // 削除（Deletion Workflow）
    // ========================================

    /// 確認ダイアログを開く。ネットワークには触れない
    ///
    /// 名前のないプロジェクトは guard も None になり、確認ボタンは有効にならない。
    pub fn request_delete(&self, project_id: &ProjectId) -> Result<(), DeckError> {
        let guard = self
            .inner
            .state
            .borrow()
            .projects
            .find(project_id)
            .map(|p| p.project_name.clone().filter(|name| !name.is_empty()))
            .ok_or_else(|| DeckError::UnknownProject(project_id.clone()))?;
        let busy = self
            .inner
            .state
            .borrow()
            .deletion
            .as_ref()
            .filter(|d| d.phase() == DeletePhase::Deleting)
            .map(|d| d.project_id().clone());
        if let Some(busy) = busy {
            return Err(DeckError::DeletionBusy(busy));
        }
        self.write(|s| s.deletion = Some(DeleteConfirmation::open(project_id.clone(), guard)));
        Ok(())
    }

    /// 確認入力の 1 打鍵ごとに呼ばれる。確認ボタンが押せるかを返す
    pub fn type_delete_confirmation(&self, text: &str) -> Result<bool, DeckError> {
        let found = self.write_if(|s| match s.deletion.as_mut() {
            Some(dialog) => {
                dialog.set_input(text);
                true
            }
            None => false,
        });
        if !found {
            return Err(DeckError::NoPendingDeletion);
        }
        Ok(self.inner.state.borrow().can_confirm_delete())
    }

    /// 入力が一致していなければ何もしない（Blocked）
    pub async fn confirm_delete(&self) -> Result<DeleteOutcome, DeckError> {
        let start = self.write(|s| match s.deletion.as_mut() {
            None => ConfirmStart::NoDialog,
            Some(dialog) => {
                if dialog.begin_deleting() {
                    ConfirmStart::Started(dialog.project_id().clone())
                } else {
                    ConfirmStart::Blocked
                }
            }
        });
        let project_id = match start {
            ConfirmStart::Started(project_id) => project_id,
            ConfirmStart::Blocked => return Ok(DeleteOutcome::Blocked),
            ConfirmStart::NoDialog => return Err(DeckError::NoPendingDeletion),
        };

        let result = check_status(self.inner.gateway.delete_project(&project_id).await);
        let is_this_dialog = |s: &ViewState| {
            s.deletion
                .as_ref()
                .is_some_and(|d| d.project_id() == &project_id && d.phase() == DeletePhase::Deleting)
        };

        match result {
            Ok(()) => {
                info!(project_id = %project_id, "project deleted");
                self.notify(Notice::success("Project deleted"));
                self.write(|s| {
                    if is_this_dialog(&*s) {
                        s.deletion = None;
                    }
                    s.edits.discard(&project_id);
                    s.pipelines.close_if_target(&project_id);
                    s.jobs.close_if_target(&project_id);
                });
                if let Err(error) = self.refresh().await {
                    debug!(%error, "refresh after delete failed");
                }
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                warn!(project_id = %project_id, %error, "delete rejected");
                self.write(|s| {
                    if is_this_dialog(&*s)
                        && let Some(dialog) = s.deletion.as_mut()
                    {
                        dialog.reopen();
                    }
                });
                self.notify(Notice::error(error.user_message()));
                Err(error)
            }
        }
    }

    /// ダイアログを閉じる。削除処理中は閉じられない
    pub fn cancel_delete(&self) -> Result<(), DeckError> {
        let busy = self
            .inner
            .state
            .borrow()
            .deletion
            .as_ref()
            .filter(|d| d.phase() == DeletePhase::Deleting)
            .map(|d| d.project_id().clone());
        if let Some(busy) = busy {
            return Err(DeckError::DeletionBusy(busy));
        }
        self.write_if(|s| s.deletion.take().is_some());
        Ok(())
    }

    // ========================================
    // ガイド・新規作成
    // ========================================

    /// 初回ガイドは「未完了」かつ「表示中のプロジェクトがちょうど 1 件」のときだけ出す
    pub fn should_show_tour(&self) -> bool {
        let single = self.inner.state.borrow().display().len() == 1;
        single && !self.inner.tour.is_finished(TourKey::ProjectListTour)
    }

    pub fn close_tour(&self) {
        self.inner.tour.finish(TourKey::ProjectListTour);
    }

    pub fn open_create_dialog(&self) {
        self.write_if(|s| !std::mem::replace(&mut s.create_dialog_open, true));
    }

    pub fn close_create_dialog(&self) {
        self.write_if(|s| std::mem::replace(&mut s.create_dialog_open, false));
    }

    /// 作成ダイアログからの送信。成功したらダイアログを閉じて refresh
    pub async fn create_project(&self, descriptor: ProjectDescriptor) -> Result<Project, DeckError> {
        match self.inner.gateway.create_project(descriptor).await {
            Ok(project) => {
                info!(project_id = %project.project_id, "project created");
                self.close_create_dialog();
                if let Err(error) = self.refresh().await {
                    debug!(%error, "refresh after create failed");
                }
                Ok(project)
            }
            Err(error) => {
                warn!(%error, "failed to create project");
                self.notify(Notice::error(error.to_string()));
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ViewModelBuilder;
    use crate::domain::{BadgeStatus, ComputeMode, NoticeLevel};
    use crate::impls::gated::GatedGateway;
    use crate::impls::{InMemoryGuideTour, InMemoryNotifier, InMemoryProjectGateway};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    struct Harness {
        vm: ProjectListViewModel,
        gateway: Arc<GatedGateway>,
        notifier: Arc<InMemoryNotifier>,
    }

    fn pid(id: &str) -> ProjectId {
        ProjectId::new(id)
    }

    /// `names` を p1, p2, ... として登録し、最初の refresh まで済ませる
    async fn harness(names: &[&str]) -> Harness {
        harness_with(names, ListConfig::default()).await
    }

    async fn harness_with(names: &[&str], config: ListConfig) -> Harness {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let inner = InMemoryProjectGateway::with_clock(FixedClock::new(at));
        for (i, name) in names.iter().enumerate() {
            let project = Project::new(pid(&format!("p{}", i + 1)), *name, at)
                .with_description(format!("about {name}"));
            inner.insert_project(project).await;
        }
        let gateway = Arc::new(GatedGateway::new(inner));
        let notifier = Arc::new(InMemoryNotifier::new());
        let vm = ViewModelBuilder::new()
            .gateway(gateway.clone())
            .notifier(notifier.clone())
            .tour(Arc::new(InMemoryGuideTour::new()))
            .list_config(config)
            .build()
            .unwrap();
        assert_eq!(vm.refresh().await.unwrap(), LoadOutcome::Applied);
        Harness {
            vm,
            gateway,
            notifier,
        }
    }

    /// spawn したタスクが Gateway の await まで進むのを待つ
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn display_names(vm: &ProjectListViewModel) -> Vec<String> {
        vm.snapshot()
            .display()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn refresh_populates_both_lists() {
        let h = harness(&["Alpha", "Beta"]).await;
        let snapshot = h.vm.snapshot();
        assert_eq!(snapshot.projects.full().len(), 2);
        assert_eq!(display_names(&h.vm), vec!["Alpha", "Beta"]);
        assert!(!snapshot.projects.is_loading());
    }

    #[tokio::test]
    async fn search_and_mode_filter_project_the_full_list() {
        let h = harness(&["Alpha", "alpha two", "Beta"]).await;

        h.vm.search("Al");
        assert_eq!(display_names(&h.vm), vec!["Alpha"]);
        h.vm.search("");
        assert_eq!(display_names(&h.vm).len(), 3);

        h.gateway
            .inner
            .insert_project(
                Project::new(pid("hub"), "Hubby", Utc::now()).with_mode(ComputeMode::Hub),
            )
            .await;
        h.vm.refresh().await.unwrap();
        h.vm.filter_by_mode(ModeFilter::Pipeline);
        assert_eq!(display_names(&h.vm), vec!["Alpha", "alpha two", "Beta"]);
        h.vm.filter_by_mode(ModeFilter::All);
        assert_eq!(display_names(&h.vm).len(), 4);
        assert_eq!(h.vm.snapshot().projects.full().len(), 4);
    }

    #[tokio::test]
    async fn refresh_is_last_issued_wins() {
        let h = harness(&["Alpha"]).await;
        let at = Utc::now();
        h.gateway.script_list(vec![Project::new(pid("old"), "Old", at)]);
        h.gateway.script_list(vec![Project::new(pid("new"), "New", at)]);
        h.gateway.hold_projects();

        let vm = h.vm.clone();
        let first = tokio::spawn(async move { vm.refresh().await });
        settle().await;
        let vm = h.vm.clone();
        let second = tokio::spawn(async move { vm.refresh().await });
        settle().await;

        h.gateway.release_projects();
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Discarded);
        assert!(h.vm.snapshot().projects.is_loading());

        h.gateway.release_projects();
        assert_eq!(second.await.unwrap().unwrap(), LoadOutcome::Applied);
        assert_eq!(display_names(&h.vm), vec!["New"]);
        assert!(!h.vm.snapshot().projects.is_loading());
    }

    #[tokio::test]
    async fn stale_pipelines_never_replace_newer_request() {
        let h = harness(&["A", "B"]).await;
        h.gateway.inner.add_pipeline(&pid("p1"), "graph-of-a").await;
        h.gateway.inner.add_pipeline(&pid("p2"), "graph-of-b").await;
        h.gateway.hold_pipelines(&pid("p1"));
        h.gateway.hold_pipelines(&pid("p2"));

        let vm = h.vm.clone();
        let open_a = tokio::spawn(async move { vm.open_pipelines(&pid("p1")).await });
        settle().await;
        let vm = h.vm.clone();
        let open_b = tokio::spawn(async move { vm.open_pipelines(&pid("p2")).await });
        settle().await;

        h.gateway.release_pipelines(&pid("p1"));
        assert_eq!(open_a.await.unwrap().unwrap(), LoadOutcome::Discarded);
        let snapshot = h.vm.snapshot();
        assert!(snapshot.pipelines.items().is_empty());
        assert!(snapshot.pipelines.is_loading());
        assert_eq!(snapshot.pipelines.target(), Some(&pid("p2")));

        h.gateway.release_pipelines(&pid("p2"));
        assert_eq!(open_b.await.unwrap().unwrap(), LoadOutcome::Applied);
        let snapshot = h.vm.snapshot();
        assert_eq!(snapshot.pipelines.items(), &[PipelineSummary::new("graph-of-b")]);
        assert!(!snapshot.pipelines.is_loading());
    }

    #[tokio::test]
    async fn closing_discards_late_pipelines() {
        let h = harness(&["A"]).await;
        h.gateway.inner.add_pipeline(&pid("p1"), "graph").await;
        h.gateway.hold_pipelines(&pid("p1"));

        let vm = h.vm.clone();
        let open = tokio::spawn(async move { vm.open_pipelines(&pid("p1")).await });
        settle().await;
        h.vm.close_pipelines();
        h.gateway.release_pipelines(&pid("p1"));

        assert_eq!(open.await.unwrap().unwrap(), LoadOutcome::Discarded);
        let snapshot = h.vm.snapshot();
        assert!(snapshot.pipelines.items().is_empty());
        assert!(!snapshot.pipelines.is_loading());
    }

    #[tokio::test]
    async fn closing_empty_pipelines_changes_nothing() {
        let h = harness(&["A"]).await;
        let mut rx = h.vm.subscribe();

        h.vm.close_pipelines();
        h.vm.close_pipelines();

        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().pipelines.items().is_empty());
    }

    #[tokio::test]
    async fn jobs_are_limited_and_badged() {
        let config = ListConfig {
            recent_jobs_limit: 2,
            ..ListConfig::default()
        };
        let h = harness_with(&["A"], config).await;
        h.gateway.inner.add_job(&pid("p1"), "SUCCEED").await;
        h.gateway.inner.add_job(&pid("p1"), "failed").await;
        h.gateway.inner.add_job(&pid("p1"), "RUNNING").await;

        assert_eq!(h.vm.open_jobs(&pid("p1")).await.unwrap(), LoadOutcome::Applied);
        let snapshot = h.vm.snapshot();
        let badges: Vec<_> = snapshot.jobs.items().iter().map(JobSummary::badge).collect();
        assert_eq!(badges, vec![Some(BadgeStatus::InProgress), Some(BadgeStatus::Error)]);

        h.vm.close_jobs();
        assert!(h.vm.snapshot().jobs.items().is_empty());
    }

    #[tokio::test]
    async fn pipelines_and_jobs_load_independently() {
        let h = harness(&["A"]).await;
        h.gateway.inner.add_pipeline(&pid("p1"), "graph").await;
        h.gateway.hold_jobs(&pid("p1"));

        let vm = h.vm.clone();
        let jobs = tokio::spawn(async move { vm.open_jobs(&pid("p1")).await });
        settle().await;
        h.vm.open_pipelines(&pid("p1")).await.unwrap();

        let snapshot = h.vm.snapshot();
        assert!(snapshot.jobs.is_loading());
        assert!(!snapshot.pipelines.is_loading());
        assert_eq!(snapshot.pipelines.items().len(), 1);

        h.gateway.release_jobs(&pid("p1"));
        assert_eq!(jobs.await.unwrap().unwrap(), LoadOutcome::Applied);
    }

    #[tokio::test]
    async fn failed_sub_resource_load_is_reported() {
        let h = harness(&["A"]).await;
        h.gateway
            .force_error(Some(GatewayError::Unavailable("timeout".into())));

        let err = h.vm.open_pipelines(&pid("p1")).await.unwrap_err();
        assert!(matches!(err, DeckError::Gateway(_)));
        assert!(!h.vm.snapshot().pipelines.is_loading());
        assert_eq!(h.notifier.snapshot().last().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn rename_commit_updates_then_refreshes() {
        let h = harness(&["Alpha"]).await;
        let calls_before = h.gateway.list_projects_calls();

        h.vm.begin_edit(&pid("p1")).unwrap();
        assert_eq!(h.vm.snapshot().edits.draft(&pid("p1")), Some("Alpha"));
        h.vm.set_draft(&pid("p1"), "Beta").unwrap();

        assert_eq!(h.vm.commit_edit(&pid("p1")).await.unwrap(), CommitOutcome::Saved);

        assert_eq!(
            h.gateway.updates(),
            vec![UpdateProjectRequest {
                project_id: pid("p1"),
                name: "Beta".into(),
                description: Some("about Alpha".into()),
            }]
        );
        assert_eq!(h.gateway.list_projects_calls(), calls_before + 1);
        assert!(!h.vm.snapshot().is_editing(&pid("p1")));
        assert_eq!(display_names(&h.vm), vec!["Beta"]);

        let levels: Vec<_> = h.notifier.drain().into_iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Loading, NoticeLevel::Dismiss]);
    }

    #[tokio::test]
    async fn draft_is_capped_at_configured_length() {
        let h = harness(&["Alpha"]).await;
        h.vm.begin_edit(&pid("p1")).unwrap();
        h.vm.set_draft(&pid("p1"), &"x".repeat(40)).unwrap();
        assert_eq!(h.vm.snapshot().edits.draft(&pid("p1")).map(str::len), Some(32));
    }

    #[tokio::test]
    async fn rejected_rename_stays_in_edit_mode() {
        let h = harness(&["Alpha"]).await;
        let calls_before = h.gateway.list_projects_calls();
        h.gateway.force_status(Some(ApiStatus::failed(4001, "name taken")));

        h.vm.begin_edit(&pid("p1")).unwrap();
        h.vm.set_draft(&pid("p1"), "Beta").unwrap();
        let err = h.vm.commit_edit(&pid("p1")).await.unwrap_err();

        assert_eq!(err, DeckError::rejected(4001, "name taken"));
        let snapshot = h.vm.snapshot();
        assert!(snapshot.is_editing(&pid("p1")));
        assert_eq!(snapshot.edits.draft(&pid("p1")), Some("Beta"));
        assert_eq!(h.gateway.list_projects_calls(), calls_before);
        assert_eq!(h.notifier.snapshot().last(), Some(&Notice::error("name taken")));

        // リトライできる
        h.gateway.force_status(None);
        assert_eq!(h.vm.commit_edit(&pid("p1")).await.unwrap(), CommitOutcome::Saved);
    }

    #[tokio::test]
    async fn blur_then_enter_issues_one_update() {
        let h = harness(&["Alpha"]).await;
        h.vm.begin_edit(&pid("p1")).unwrap();
        h.vm.set_draft(&pid("p1"), "Beta").unwrap();
        h.gateway.hold_projects();

        let vm = h.vm.clone();
        let blur = tokio::spawn(async move { vm.commit_edit(&pid("p1")).await });
        settle().await;
        assert_eq!(h.vm.commit_edit(&pid("p1")).await.unwrap(), CommitOutcome::InFlight);

        h.gateway.release_projects();
        assert_eq!(blur.await.unwrap().unwrap(), CommitOutcome::Saved);
        assert_eq!(h.gateway.updates().len(), 1);
    }

    #[tokio::test]
    async fn commit_without_edit_is_rejected() {
        let h = harness(&["Alpha"]).await;
        let err = h.vm.commit_edit(&pid("p1")).await.unwrap_err();
        assert_eq!(err, DeckError::NotEditing(pid("p1")));
        assert!(h.gateway.updates().is_empty());

        let err = h.vm.begin_edit(&pid("missing")).unwrap_err();
        assert_eq!(err, DeckError::UnknownProject(pid("missing")));
    }

    #[tokio::test]
    async fn delete_requires_exact_guard() {
        let h = harness(&["Proj1", "Other"]).await;

        h.vm.request_delete(&pid("p1")).unwrap();
        assert!(!h.vm.type_delete_confirmation("Proj").unwrap());
        assert_eq!(h.vm.confirm_delete().await.unwrap(), DeleteOutcome::Blocked);
        assert!(h.gateway.deletes().is_empty());

        assert!(h.vm.type_delete_confirmation("Proj1").unwrap());
        assert_eq!(h.vm.confirm_delete().await.unwrap(), DeleteOutcome::Deleted);

        assert_eq!(h.gateway.deletes(), vec![pid("p1")]);
        let snapshot = h.vm.snapshot();
        assert!(snapshot.deletion.is_none());
        assert_eq!(display_names(&h.vm), vec!["Other"]);
        assert_eq!(h.notifier.snapshot().last(), Some(&Notice::success("Project deleted")));
    }

    #[tokio::test]
    async fn nameless_project_is_never_deleted_silently() {
        let h = harness(&["Other"]).await;
        let mut anon = Project::new(pid("anon"), "", Utc::now());
        anon.project_name = None;
        h.gateway.inner.insert_project(anon).await;
        h.vm.refresh().await.unwrap();

        h.vm.request_delete(&pid("anon")).unwrap();
        assert!(!h.vm.snapshot().can_confirm_delete());
        assert_eq!(h.vm.confirm_delete().await.unwrap(), DeleteOutcome::Blocked);

        assert!(!h.vm.type_delete_confirmation("").unwrap());
        assert_eq!(h.vm.confirm_delete().await.unwrap(), DeleteOutcome::Blocked);
        assert!(h.gateway.deletes().is_empty());
        assert_eq!(h.vm.snapshot().projects.full().len(), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_dialog_open() {
        let h = harness(&["Proj1"]).await;
        h.gateway.force_status(Some(ApiStatus::failed(5000, "project is running")));

        h.vm.request_delete(&pid("p1")).unwrap();
        h.vm.type_delete_confirmation("Proj1").unwrap();
        let err = h.vm.confirm_delete().await.unwrap_err();
        assert_eq!(err.user_message(), "project is running");

        let snapshot = h.vm.snapshot();
        let dialog = snapshot.deletion.as_ref().unwrap();
        assert_eq!(dialog.phase(), DeletePhase::ConfirmOpen);
        assert_eq!(dialog.input(), "Proj1");
        assert!(snapshot.can_confirm_delete());
        assert_eq!(display_names(&h.vm), vec!["Proj1"]);
    }

    #[tokio::test]
    async fn deleting_open_project_clears_its_popovers_and_edits() {
        let h = harness(&["Proj1"]).await;
        h.gateway.inner.add_pipeline(&pid("p1"), "graph").await;
        h.vm.open_pipelines(&pid("p1")).await.unwrap();
        h.vm.begin_edit(&pid("p1")).unwrap();

        h.vm.request_delete(&pid("p1")).unwrap();
        h.vm.type_delete_confirmation("Proj1").unwrap();
        h.vm.confirm_delete().await.unwrap();

        let snapshot = h.vm.snapshot();
        assert!(snapshot.pipelines.items().is_empty());
        assert!(!snapshot.is_editing(&pid("p1")));
    }

    #[tokio::test]
    async fn cancel_closes_dialog_without_network() {
        let h = harness(&["Proj1"]).await;
        h.vm.request_delete(&pid("p1")).unwrap();
        h.vm.cancel_delete().unwrap();

        assert!(h.vm.snapshot().deletion.is_none());
        assert!(h.gateway.deletes().is_empty());
        assert_eq!(h.vm.confirm_delete().await.unwrap_err(), DeckError::NoPendingDeletion);
    }

    #[tokio::test]
    async fn tour_shows_only_for_single_unfinished_project() {
        let h = harness(&["Only"]).await;
        assert!(h.vm.should_show_tour());
        h.vm.close_tour();
        assert!(!h.vm.should_show_tour());

        let h = harness(&["A", "B"]).await;
        assert!(!h.vm.should_show_tour());
        h.vm.search("A");
        assert!(h.vm.should_show_tour());
    }

    #[tokio::test]
    async fn rejected_create_keeps_dialog_open() {
        let h = harness(&["Alpha"]).await;
        h.vm.open_create_dialog();

        let err = h.vm.create_project(ProjectDescriptor::new("")).await.unwrap_err();

        assert!(matches!(err, DeckError::Gateway(GatewayError::Rejected(_))));
        assert!(h.vm.snapshot().create_dialog_open);
        assert_eq!(display_names(&h.vm), vec!["Alpha"]);
        let notices = h.notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn create_closes_dialog_and_refreshes() {
        let h = harness(&[]).await;
        h.vm.open_create_dialog();
        assert!(h.vm.snapshot().create_dialog_open);

        let created = h.vm.create_project(ProjectDescriptor::new("Fresh")).await.unwrap();

        let snapshot = h.vm.snapshot();
        assert!(!snapshot.create_dialog_open);
        assert_eq!(snapshot.display()[0].project_id, created.project_id);
        assert!(h.vm.should_show_tour());
    }
}
