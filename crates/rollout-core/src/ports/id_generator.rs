//! IdGenerator port - ID 生成の抽象化
//!
//! IdGenerator は分散システムで使える ID を生成するためのインターフェースです。
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::{DeploymentId, IdempotencyToken};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator はデプロイメント ID を生成
///
/// idempotency token は相関のために渡されます。同じ token で二度呼ばれた場合の
/// 扱い（重複排除するかどうか）は実装と呼び出し側の責任です。
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_deployment_id(&self, token: &IdempotencyToken) -> DeploymentId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn generate_deployment_id(&self, token: &IdempotencyToken) -> DeploymentId {
        (**self).generate_deployment_id(token)
    }
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// これにより、テスト時に FixedClock を使って timestamp 部分を固定できます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    /// 新しい UlidGenerator を作成
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock + Send + Sync> IdGenerator for UlidGenerator<C> {
    fn generate_deployment_id(&self, token: &IdempotencyToken) -> DeploymentId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        let id = DeploymentId::from(ulid);
        tracing::trace!(deployment_id = %id, token = %token, "generated deployment id");
        id
    }
}
