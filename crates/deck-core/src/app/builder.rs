//! ViewModelBuilder - view-model の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: Gateway がなければ build() が失敗する
//! - 任意の依存（ガイド・通知）には開発用の既定実装を入れる

use std::sync::Arc;

use super::view_model::ProjectListViewModel;
use crate::config::{DeckConfig, ListConfig};
use crate::impls::{InMemoryGuideTour, JsonFileGuideTour, TracingNotifier};
use crate::ports::{GuideTour, Notifier, ProjectGateway};

/// ViewModelBuilder は ProjectListViewModel を構築
///
/// # 使用例
/// ```ignore
/// let vm = ViewModelBuilder::from_config(&config)
///     .gateway(Arc::new(InMemoryProjectGateway::new()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct ViewModelBuilder {
    gateway: Option<Arc<dyn ProjectGateway>>,
    tour: Option<Arc<dyn GuideTour>>,
    notifier: Option<Arc<dyn Notifier>>,
    config: ListConfig,
}

/// BuildError は view-model 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No project gateway was configured. Call `.gateway(...)` before `.build()`.")]
    MissingGateway,
}

impl ViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定ファイルから一覧設定とガイド保存先を取り込む
    ///
    /// `tour.state_path` があればガイド完了状態をそのファイルに保存する。
    pub fn from_config(config: &DeckConfig) -> Self {
        let mut builder = Self::new().list_config(config.list.clone());
        if let Some(path) = &config.tour.state_path {
            builder = builder.tour(Arc::new(JsonFileGuideTour::open(path.clone())));
        }
        builder
    }

    pub fn gateway(mut self, gateway: Arc<dyn ProjectGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// 省略時は InMemoryGuideTour（プロセス終了で忘れる）
    pub fn tour(mut self, tour: Arc<dyn GuideTour>) -> Self {
        self.tour = Some(tour);
        self
    }

    /// 省略時は TracingNotifier
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn list_config(mut self, config: ListConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ProjectListViewModel, BuildError> {
        let gateway = self.gateway.ok_or(BuildError::MissingGateway)?;
        let tour = self
            .tour
            .unwrap_or_else(|| Arc::new(InMemoryGuideTour::new()));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));
        Ok(ProjectListViewModel::new(gateway, tour, notifier, self.config))
    }
}
