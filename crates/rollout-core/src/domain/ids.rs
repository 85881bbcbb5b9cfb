//! Deployment identifiers.
//!
//! `DeploymentId` は ULID ベースです。
//! - **時刻でソート可能**: 生成順に並ぶので、ログや一覧で作成順が追える
//! - **分散生成可能**: 調整なしで複数ノードから発行できる
//!
//! `IdempotencyToken` は呼び出し側が渡す値で、このクレートでは検証しません。
//! 重複ロールアウトの防止（一意性の保証）は呼び出し側の責任です。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of a Deployment (one rollout attempt).
///
/// Display は `deployment-<ULID>` 形式で、空文字列になることはありません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(Ulid);

impl DeploymentId {
    const PREFIX: &'static str = "deployment-";

    /// ULID から DeploymentId を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for DeploymentId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

/// Caller-supplied token correlated with deployment creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyToken(String);

impl IdempotencyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdempotencyToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for IdempotencyToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for IdempotencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
