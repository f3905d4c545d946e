//! Behavior traits - handler の周りに巻く middleware
//!
//! # 学習ポイント
//! - `Next` は「残りの pipeline」を 1 回だけ呼べる continuation (FnOnce)
//! - `next.run()` を呼ばなければ short-circuit（内側は一切実行されない）
//! - Request 版は借用ベース (`'a`)、Stream 版は所有ベース (`'static`)

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::FlowResult;
use crate::domain::message::{Request, StreamRequest};

/// The rest of a request pipeline: inner behaviors followed by the handler.
pub struct Next<'a, T> {
    run: Box<dyn FnOnce() -> BoxFuture<'a, FlowResult<T>> + Send + 'a>,
}

impl<'a, T> Next<'a, T> {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'a, FlowResult<T>> + Send + 'a,
    {
        Self { run: Box::new(run) }
    }

    /// Invoke the inner pipeline. Consumes the continuation.
    pub fn run(self) -> BoxFuture<'a, FlowResult<T>> {
        (self.run)()
    }
}

/// PipelineBehavior は Request の handler 実行を包む
///
/// # 使用例
/// ```ignore
/// struct Logging;
///
/// #[async_trait]
/// impl PipelineBehavior<Sum> for Logging {
///     async fn handle(
///         &self,
///         request: &Sum,
///         next: Next<'_, i32>,
///         cancel: &CancellationToken,
///     ) -> FlowResult<i32> {
///         println!("enter");
///         let response = next.run().await;
///         println!("exit");
///         response
///     }
/// }
/// ```
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: &R,
        next: Next<'_, R::Response>,
        cancel: &CancellationToken,
    ) -> FlowResult<R::Response>;
}

/// The rest of a stream pipeline. Calling `run` builds (but does not poll)
/// the inner sequence.
pub struct StreamNext<T> {
    run: Box<dyn FnOnce() -> BoxStream<'static, FlowResult<T>> + Send>,
}

impl<T> StreamNext<T> {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce() -> BoxStream<'static, FlowResult<T>> + Send + 'static,
    {
        Self { run: Box::new(run) }
    }

    pub fn run(self) -> BoxStream<'static, FlowResult<T>> {
        (self.run)()
    }
}

/// StreamPipelineBehavior wraps a sequence rather than a single value.
///
/// A behavior may filter, map, interleave side effects, or return a
/// different stream without ever calling `next.run()`.
pub trait StreamPipelineBehavior<S: StreamRequest>: Send + Sync {
    fn handle(
        &self,
        request: Arc<S>,
        next: StreamNext<S::Item>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<S::Item>>;
}
