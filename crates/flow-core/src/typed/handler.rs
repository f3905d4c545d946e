//! Handler traits - メッセージ形状ごとの終端処理
//!
//! # 学習ポイント
//! - ジェネリック trait (`RequestHandler<R>`) で message と handler の対応を静的に保証
//! - `dyn RequestHandler<R>` が resolver の capability キーになる
//! - Stream handler は async fn ではなく `BoxStream` を返す（遅延評価のため）

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::FlowResult;
use crate::domain::message::{Notification, Request, StreamRequest};

/// RequestHandler は Request を 1 つ受け取り、応答を 1 つ返す
///
/// # 使用例
/// ```ignore
/// struct SumHandler;
///
/// #[async_trait]
/// impl RequestHandler<Sum> for SumHandler {
///     async fn handle(&self, request: &Sum, _cancel: &CancellationToken) -> FlowResult<i32> {
///         Ok(request.a + request.b)
///     }
/// }
/// ```
///
/// `cancel` を見るかどうかは handler 次第。見なければ最後まで実行される。
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: &R, cancel: &CancellationToken) -> FlowResult<R::Response>;
}

/// NotificationHandler は通知を受け取るだけ（応答なし）
#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync {
    async fn handle(&self, notification: &N, cancel: &CancellationToken) -> FlowResult<()>;
}

/// StreamRequestHandler produces the innermost lazy sequence.
///
/// The returned stream owns everything it needs (`Arc<S>`, a cloned token),
/// so it can outlive the dispatch call. Items are pulled one at a time; a
/// handler must not produce anything before the first poll.
pub trait StreamRequestHandler<S: StreamRequest>: Send + Sync {
    fn handle(
        &self,
        request: Arc<S>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<S::Item>>;
}
