//! App - アプリケーション層
//!
//! ports を組み合わせてデプロイメントのライフサイクルを駆動します。
//!
//! # 主要コンポーネント
//! - **DeploymentTracker**: Clock / IdGenerator / EventSink のワイヤリングと遷移
//! - **DeploymentSummary**: レポート用のステータスビュー

pub mod status;
pub mod tracker;

// 主要な型を再エクスポート
pub use self::status::DeploymentSummary;
pub use self::tracker::DeploymentTracker;
