//! App - dispatch core
//!
//! # 主要コンポーネント
//! - **HandlerCache**: request 型ごとの plan のメモ化
//! - **PipelineExecutor / StreamPipelineExecutor**: behavior の合成
//! - **RequestDispatcher / NotificationDispatcher / StreamDispatcher**: 形状ごとの配送
//! - **Mediator**: 唯一の入口
//! - **MediatorBuilder**: 構築と起動時検証

pub mod builder;
pub mod cache;
pub mod mediator;
pub mod notification;
pub mod pipeline;
pub mod request;
pub mod stream;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, MediatorBuilder};
pub use self::cache::HandlerCache;
pub use self::mediator::Mediator;
pub use self::notification::NotificationDispatcher;
pub use self::pipeline::{PipelineExecutor, StreamPipelineExecutor};
pub use self::request::{RequestDispatcher, RequestPlan};
pub use self::stream::StreamDispatcher;
