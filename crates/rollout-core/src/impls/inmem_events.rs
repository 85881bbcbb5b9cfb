//! InMemoryEventSink - 発生順にイベントを保持する
//!
//! テストや、プロセス内で履歴を見たい組み込み用途向け。

use crate::domain::DeploymentEvent;
use crate::ports::EventSink;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<DeploymentEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに記録されたイベントのコピー
    pub fn events(&self) -> Vec<DeploymentEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, event: &DeploymentEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
