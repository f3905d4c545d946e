//! RequestDispatcher - Request を唯一の handler へ届ける
//!
//! # フロー
//! 1. HandlerCache から request 型の RequestPlan を取得（なければ作成）
//! 2. plan が handler を 1 つ、behavior を 0 個以上 resolve
//! 3. PipelineExecutor を組み立てて実行

use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span};

use super::cache::HandlerCache;
use super::pipeline::PipelineExecutor;
use crate::domain::errors::FlowResult;
use crate::domain::message::{Request, message_name};
use crate::ports::Resolver;
use crate::typed::{PipelineBehavior, RequestHandler};

/// RequestPlan is the cached, type-specific dispatch entry for `R`.
///
/// It does not hold handler instances; those are resolved on every call so
/// their lifetime stays with the resolver.
pub struct RequestPlan<R: Request> {
    message: &'static str,
    _marker: PhantomData<fn(&R)>,
}

impl<R: Request> RequestPlan<R> {
    fn new() -> Self {
        Self {
            message: message_name::<R>(),
            _marker: PhantomData,
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Resolve the handler and behaviors for one dispatch.
    pub fn executor<Res: Resolver>(&self, resolver: &Res) -> FlowResult<PipelineExecutor<R>> {
        let handler = resolver.resolve_one::<dyn RequestHandler<R>>()?;
        let behaviors = resolver.resolve_many::<dyn PipelineBehavior<R>>();
        debug!(behaviors = behaviors.len(), "request pipeline resolved");
        Ok(PipelineExecutor::new(handler, behaviors))
    }
}

pub struct RequestDispatcher<Res> {
    resolver: Arc<Res>,
    cache: Arc<HandlerCache>,
}

impl<Res: Resolver> RequestDispatcher<Res> {
    pub fn new(resolver: Arc<Res>, cache: Arc<HandlerCache>) -> Self {
        Self { resolver, cache }
    }

    /// Look up (or build) the plan for `R` in the cache.
    pub fn plan<R: Request>(&self) -> Arc<RequestPlan<R>> {
        self.cache.get_or_create::<R, _, _>(|| {
            debug!(message = message_name::<R>(), "creating request plan");
            RequestPlan::<R>::new()
        })
    }

    pub async fn dispatch<R: Request>(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> FlowResult<R::Response> {
        let plan = self.plan::<R>();
        let span = debug_span!("flow.send", message = plan.message());
        let executor = span.in_scope(|| plan.executor(&*self.resolver))?;
        executor.execute(request, cancel).instrument(span).await
    }
}

impl<Res> Clone for RequestDispatcher<Res> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            cache: Arc::clone(&self.cache),
        }
    }
}
