//! StreamDispatcher - StreamRequest を唯一の handler へ届け、遅延シーケンスを返す
//!
//! handler の解決は呼び出し時点で行い、見つからなければ即エラー。
//! pipeline の組み立てと handler の実行は最初の poll まで遅延する。

use std::sync::Arc;

use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span};

use super::pipeline::StreamPipelineExecutor;
use crate::domain::errors::FlowResult;
use crate::domain::message::{StreamRequest, message_name};
use crate::ports::Resolver;
use crate::typed::{StreamPipelineBehavior, StreamRequestHandler};

pub struct StreamDispatcher<Res> {
    resolver: Arc<Res>,
}

impl<Res: Resolver> StreamDispatcher<Res> {
    pub fn new(resolver: Arc<Res>) -> Self {
        Self { resolver }
    }

    pub fn dispatch<S: StreamRequest>(
        &self,
        request: S,
        cancel: CancellationToken,
    ) -> FlowResult<BoxStream<'static, FlowResult<S::Item>>> {
        let _span = debug_span!("flow.create_stream", message = message_name::<S>()).entered();

        let handler = self.resolver.resolve_one::<dyn StreamRequestHandler<S>>()?;
        let behaviors = self.resolver.resolve_many::<dyn StreamPipelineBehavior<S>>();
        debug!(behaviors = behaviors.len(), "stream pipeline resolved");

        Ok(StreamPipelineExecutor::new(handler, behaviors).execute(Arc::new(request), cancel))
    }
}

impl<Res> Clone for StreamDispatcher<Res> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}
