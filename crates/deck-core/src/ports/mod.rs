//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! view-model が外部（リモート API、ガイド記録、通知表示）に
//! 依存する部分はすべてここの trait を経由します。

pub mod clock;
pub mod gateway;
pub mod id_generator;
pub mod notifier;
pub mod tour;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::gateway::ProjectGateway;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::Notifier;
pub use self::tour::{GuideTour, TourKey};
