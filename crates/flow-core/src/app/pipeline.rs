//! Pipeline executors - behavior の玉ねぎ構造を組み立てる
//!
//! # 組み立て方
//! 1. 終端 continuation = 「handler を呼ぶ」
//! 2. behavior を逆順に fold し、1 段ずつ外側に巻く
//! 3. 出来上がった一番外側の continuation を呼ぶ
//!
//! 結果として resolver 順で最初の behavior が一番外側になり、
//! 前処理は B1..Bn → H、後処理は H → Bn..B1 の順で走ります。

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio_util::sync::CancellationToken;
use tracing::{Span, trace};

use crate::domain::errors::FlowResult;
use crate::domain::message::{Request, StreamRequest};
use crate::typed::{
    Next, PipelineBehavior, RequestHandler, StreamNext, StreamPipelineBehavior,
    StreamRequestHandler,
};

/// Single-value pipeline: behaviors around one request handler.
pub struct PipelineExecutor<R: Request> {
    handler: Arc<dyn RequestHandler<R>>,
    behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
}

impl<R: Request> PipelineExecutor<R> {
    pub fn new(
        handler: Arc<dyn RequestHandler<R>>,
        behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
    ) -> Self {
        Self { handler, behaviors }
    }

    /// Run the request through every behavior and the handler.
    ///
    /// `cancel` is handed unchanged to each stage; the executor never
    /// checks or triggers it itself.
    pub async fn execute(&self, request: &R, cancel: &CancellationToken) -> FlowResult<R::Response> {
        self.chain(request, cancel).run().await
    }

    fn chain<'a>(&'a self, request: &'a R, cancel: &'a CancellationToken) -> Next<'a, R::Response> {
        let handler = &self.handler;
        let terminal = Next::new(move || {
            trace!("invoking request handler");
            handler.handle(request, cancel)
        });

        self.behaviors
            .iter()
            .enumerate()
            .rev()
            .fold(terminal, |next, (depth, behavior)| {
                Next::new(move || {
                    trace!(depth, "entering behavior");
                    behavior.handle(request, next, cancel)
                })
            })
    }
}

/// Sequence pipeline: behaviors around one stream handler.
///
/// Nothing runs until the returned stream is first polled, and every layer
/// pulls from the one inside it on demand. Each poll runs inside the span
/// that was current when `execute` was called.
pub struct StreamPipelineExecutor<S: StreamRequest> {
    handler: Arc<dyn StreamRequestHandler<S>>,
    behaviors: Vec<Arc<dyn StreamPipelineBehavior<S>>>,
}

impl<S: StreamRequest> StreamPipelineExecutor<S> {
    pub fn new(
        handler: Arc<dyn StreamRequestHandler<S>>,
        behaviors: Vec<Arc<dyn StreamPipelineBehavior<S>>>,
    ) -> Self {
        Self { handler, behaviors }
    }

    pub fn execute(
        self,
        request: Arc<S>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<S::Item>> {
        let Self { handler, behaviors } = self;

        let terminal = {
            let request = Arc::clone(&request);
            let cancel = cancel.clone();
            StreamNext::new(move || {
                trace!("invoking stream handler");
                handler.handle(request, cancel)
            })
        };

        let chain = behaviors
            .into_iter()
            .enumerate()
            .rev()
            .fold(terminal, |next, (depth, behavior)| {
                let request = Arc::clone(&request);
                let cancel = cancel.clone();
                StreamNext::new(move || {
                    trace!(depth, "entering stream behavior");
                    behavior.handle(request, next, cancel)
                })
            });

        // Defer building the chain to the first poll.
        let span = Span::current();
        let mut items = stream::once(async move { chain.run() }).flatten().boxed();
        stream::poll_fn(move |cx| {
            let _entered = span.enter();
            items.poll_next_unpin(cx)
        })
        .boxed()
    }
}
