//! deck-core
//!
//! Core building blocks for the project list screen of the Deck platform.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, project, resources, status, errors, events）
//! - **ports**: 抽象化レイヤー（ProjectGateway, GuideTour, Notifier, Clock, IdGenerator）
//! - **store**: 同期的な状態機械（一覧と絞り込み、サブリソース slot、編集、削除確認）
//! - **app**: view-model（builder, state, view_model）
//! - **impls**: 実装（InMemoryProjectGateway など開発用）
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod store;
