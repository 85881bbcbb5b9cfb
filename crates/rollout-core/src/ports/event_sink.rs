//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - TracingEventSink: tracing にログとして出す
//! - InMemoryEventSink: 発生順に保持（テスト・組み込み用）

use crate::domain::DeploymentEvent;
use std::sync::Arc;

/// EventSink はドメインイベントを記録
///
/// 戻り値なし。記録に失敗しても遷移は取り消さない。
pub trait EventSink {
    fn emit(&self, event: &DeploymentEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &DeploymentEvent) {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &DeploymentEvent) {
        (**self).emit(event)
    }
}
