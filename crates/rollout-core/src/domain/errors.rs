//! Errors - デプロイメント操作のエラー型と分類

use super::ids::DeploymentId;
use super::state::DeploymentStatus;

/// ErrorKind はエラーの分類
///
/// - Validation: 入力が不正（作成時、または保存済みレコードの読み込み時）
/// - State: 現在の状態では許可されない遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
}

/// DeploymentError はドメインエラー
///
/// State エラーを返した場合、エンティティは変更されていません。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeploymentError {
    #[error("task definition cannot be empty")]
    EmptyTaskDefinition,

    #[error("deployment {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: DeploymentId,
        from: DeploymentStatus,
        to: DeploymentStatus,
    },

    #[error("inconsistent deployment record: {0}")]
    InconsistentRecord(&'static str),
}

impl DeploymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeploymentError::EmptyTaskDefinition | DeploymentError::InconsistentRecord(_) => {
                ErrorKind::Validation
            }
            DeploymentError::InvalidTransition { .. } => ErrorKind::State,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_state(&self) -> bool {
        self.kind() == ErrorKind::State
    }
}
