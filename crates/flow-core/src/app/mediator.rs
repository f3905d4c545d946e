//! Mediator - send / publish / create_stream の唯一の入口
//!
//! ロジックは持たず、メッセージの形に対応する dispatcher へ委譲するだけ。
//! どの形かは trait bound (`Request` / `Notification` / `StreamRequest`) で
//! コンパイル時に決まる。

use std::sync::Arc;

use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use super::cache::HandlerCache;
use super::notification::NotificationDispatcher;
use super::request::RequestDispatcher;
use super::stream::StreamDispatcher;
use crate::domain::errors::FlowResult;
use crate::domain::message::{Notification, Request, StreamRequest};
use crate::ports::Resolver;

/// Mediator routes messages from callers to handlers.
///
/// Cloning is cheap: clones share the resolver and the handler cache.
pub struct Mediator<Res> {
    requests: RequestDispatcher<Res>,
    notifications: NotificationDispatcher<Res>,
    streams: StreamDispatcher<Res>,
    cache: Arc<HandlerCache>,
}

impl<Res: Resolver> Mediator<Res> {
    pub fn new(resolver: Res) -> Self {
        Self::from_parts(Arc::new(resolver), Arc::new(HandlerCache::new()))
    }

    pub(crate) fn from_parts(resolver: Arc<Res>, cache: Arc<HandlerCache>) -> Self {
        Self {
            requests: RequestDispatcher::new(Arc::clone(&resolver), Arc::clone(&cache)),
            notifications: NotificationDispatcher::new(Arc::clone(&resolver)),
            streams: StreamDispatcher::new(resolver),
            cache,
        }
    }

    /// Send a request to its single handler and return the response.
    pub async fn send<R: Request>(&self, request: R) -> FlowResult<R::Response> {
        self.send_with_cancel(request, &CancellationToken::new()).await
    }

    pub async fn send_with_cancel<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> FlowResult<R::Response> {
        self.requests.dispatch(&request, cancel).await
    }

    /// Publish a notification to every handler, one after another.
    pub async fn publish<N: Notification>(&self, notification: N) -> FlowResult<()> {
        self.publish_with_cancel(notification, &CancellationToken::new())
            .await
    }

    pub async fn publish_with_cancel<N: Notification>(
        &self,
        notification: N,
        cancel: &CancellationToken,
    ) -> FlowResult<()> {
        self.notifications.dispatch(&notification, cancel).await
    }

    /// Create the lazy item sequence for a stream request.
    ///
    /// Fails immediately when no single handler is registered; nothing else
    /// runs until the stream is polled.
    pub fn create_stream<S: StreamRequest>(
        &self,
        request: S,
    ) -> FlowResult<BoxStream<'static, FlowResult<S::Item>>> {
        self.create_stream_with_cancel(request, CancellationToken::new())
    }

    pub fn create_stream_with_cancel<S: StreamRequest>(
        &self,
        request: S,
        cancel: CancellationToken,
    ) -> FlowResult<BoxStream<'static, FlowResult<S::Item>>> {
        self.streams.dispatch(request, cancel)
    }

    pub fn handler_cache(&self) -> &Arc<HandlerCache> {
        &self.cache
    }
}

impl<Res> Clone for Mediator<Res> {
    fn clone(&self) -> Self {
        Self {
            requests: self.requests.clone(),
            notifications: self.notifications.clone(),
            streams: self.streams.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}
