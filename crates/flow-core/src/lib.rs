//! flow-core
//!
//! In-process message dispatch: requests, notifications and stream requests
//! routed from callers to handlers through ordered behavior pipelines.
//!
//! # モジュール構成
//! - **domain**: メッセージ形状 (Request, Notification, StreamRequest) とエラー
//! - **ports**: 外部協調者の抽象 (Resolver)
//! - **typed**: 型付き Handler / Behavior trait
//! - **app**: dispatch core (cache, pipeline, dispatchers, Mediator, builder)
//! - **impls**: 実装 (InMemoryResolver など開発用)

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{BuildError, HandlerCache, Mediator, MediatorBuilder};
pub use domain::{FlowError, FlowResult, Notification, Request, StreamRequest};
pub use impls::InMemoryResolver;
pub use ports::Resolver;
pub use typed::{
    Next, NotificationHandler, PipelineBehavior, RequestHandler, StreamNext,
    StreamPipelineBehavior, StreamRequestHandler,
};
