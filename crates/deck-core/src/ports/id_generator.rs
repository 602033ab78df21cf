//! IdGenerator port - ID 生成の抽象化
//!
//! 本物の Gateway ではサーバーが ID を発行しますが、
//! in-memory 実装では自分で発行する必要があります。
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース

use crate::domain::ids::{JobId, ProjectId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は新しい ID を発行
///
/// # Thread Safety
/// - `Send + Sync` を要求（Gateway 実装から共有される）
pub trait IdGenerator: Send + Sync {
    fn generate_project_id(&self) -> ProjectId;

    fn generate_job_id(&self) -> JobId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// FixedClock を使えば timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_project_id(&self) -> ProjectId {
        ProjectId::mint(self.next_ulid())
    }

    fn generate_job_id(&self) -> JobId {
        JobId::mint(self.next_ulid())
    }
}
