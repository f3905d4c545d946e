use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flow_core::{
    FlowError, FlowResult, InMemoryResolver, MediatorBuilder, Next, Notification,
    NotificationHandler, PipelineBehavior, Request, RequestHandler, StreamRequest,
    StreamRequestHandler,
};

struct Sum {
    a: i32,
    b: i32,
}

impl Request for Sum {
    type Response = i32;
}

struct SumHandler;

#[async_trait]
impl RequestHandler<Sum> for SumHandler {
    async fn handle(&self, request: &Sum, _cancel: &CancellationToken) -> FlowResult<i32> {
        Ok(request.a + request.b)
    }
}

/// 前後にログを出すだけの behavior
struct Logging;

#[async_trait]
impl PipelineBehavior<Sum> for Logging {
    async fn handle(
        &self,
        request: &Sum,
        next: Next<'_, i32>,
        _cancel: &CancellationToken,
    ) -> FlowResult<i32> {
        info!(a = request.a, b = request.b, "enter");
        let response = next.run().await;
        info!(ok = response.is_ok(), "exit");
        response
    }
}

struct Ping;

impl Notification for Ping {}

struct Greeter(&'static str);

#[async_trait]
impl NotificationHandler<Ping> for Greeter {
    async fn handle(&self, _notification: &Ping, _cancel: &CancellationToken) -> FlowResult<()> {
        info!(handler = self.0, "ping received");
        Ok(())
    }
}

struct Ticks {
    every: Duration,
}

impl StreamRequest for Ticks {
    type Item = u64;
}

struct TicksHandler;

impl StreamRequestHandler<Ticks> for TicksHandler {
    fn handle(&self, request: Arc<Ticks>, cancel: CancellationToken) -> BoxStream<'static, FlowResult<u64>> {
        stream::unfold(0u64, move |n| {
            let every = request.every;
            let cancel = cancel.clone();
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    _ = tokio::time::sleep(every) => Some((Ok(n), n + 1)),
                }
            }
        })
        .boxed()
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOW_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    // (A) 登録（本来はアプリ側のブートストラップの責務）
    let mut resolver = InMemoryResolver::new();
    resolver
        .add_request_handler::<Sum, _>(SumHandler)
        .add_behavior::<Sum, _>(Logging)
        .add_notification_handler::<Ping, _>(Greeter("H1"))
        .add_notification_handler::<Ping, _>(Greeter("H2"))
        .add_stream_handler::<Ticks, _>(TicksHandler);

    // (B) 起動時検証つきで Mediator を構築
    let mediator = MediatorBuilder::new(resolver)
        .expect_request::<Sum>()
        .expect_stream::<Ticks>()
        .build()?;

    // (C) request / notification
    let total = mediator.send(Sum { a: 3, b: 4 }).await?;
    info!(total, "sum computed");
    mediator.publish(Ping).await?;

    // (D) stream: 5 件受け取ったらキャンセル
    let cancel = CancellationToken::new();
    let mut ticks = mediator.create_stream_with_cancel(
        Ticks {
            every: Duration::from_millis(20),
        },
        cancel.clone(),
    )?;
    while let Some(tick) = ticks.next().await {
        let tick = tick?;
        info!(tick, "tick");
        if tick == 4 {
            cancel.cancel();
        }
    }

    // (E) 未登録の request は HandlerNotFound
    struct Unhandled;
    impl Request for Unhandled {
        type Response = ();
    }
    if let Err(err @ FlowError::HandlerNotFound { .. }) = mediator.send(Unhandled).await {
        warn!(error = %err, "expected failure");
    }

    Ok(())
}
