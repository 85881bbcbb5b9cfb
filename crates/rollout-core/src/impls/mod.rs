//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TracingEventSink**: 本番用（tracing にログとして出す）
//! - **InMemoryEventSink**: テスト・組み込み用

pub mod inmem_events;
pub mod tracing_sink;

// 主要な型を再エクスポート
pub use self::inmem_events::InMemoryEventSink;
pub use self::tracing_sink::TracingEventSink;
