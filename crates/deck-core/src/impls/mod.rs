//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryProjectGateway**: 開発用の Gateway
//! - **InMemoryGuideTour / JsonFileGuideTour**: ガイド完了状態
//! - **TracingNotifier / InMemoryNotifier**: 通知の出口
//!
//! 本番の Gateway（HTTP クライアント）は別クレートに置く想定です。

pub mod inmem_gateway;
pub mod notifier;
pub mod tour;

#[cfg(test)]
pub(crate) mod gated;

// 主要な型を再エクスポート
pub use self::inmem_gateway::InMemoryProjectGateway;
pub use self::notifier::{InMemoryNotifier, TracingNotifier};
pub use self::tour::{InMemoryGuideTour, JsonFileGuideTour};
