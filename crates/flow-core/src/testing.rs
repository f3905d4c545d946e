//! Test fixtures shared by the unit tests of every module.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{FlowError, FlowResult, Notification, Request, StreamRequest};
use crate::typed::{
    Next, NotificationHandler, PipelineBehavior, RequestHandler, StreamNext,
    StreamPipelineBehavior, StreamRequestHandler,
};

/// Shared, ordered record of what ran.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

// ── request ────────────────────────────────────────────────────────────────

pub struct Sum {
    pub a: i32,
    pub b: i32,
}

impl Request for Sum {
    type Response = i32;
}

pub struct SumHandler;

#[async_trait]
impl RequestHandler<Sum> for SumHandler {
    async fn handle(&self, request: &Sum, _cancel: &CancellationToken) -> FlowResult<i32> {
        Ok(request.a + request.b)
    }
}

/// Logs `<name>:pre` and `<name>:post` around `next`.
pub struct RecordingBehavior {
    name: String,
    log: Log,
}

impl RecordingBehavior {
    pub fn new(name: impl Into<String>, log: &Log) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for RecordingBehavior {
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        _cancel: &CancellationToken,
    ) -> FlowResult<R::Response> {
        self.log.push(format!("{}:pre", self.name));
        let response = next.run().await;
        self.log.push(format!("{}:post", self.name));
        response
    }
}

/// Answers without calling `next`.
pub struct ShortCircuit {
    value: i32,
    log: Log,
}

impl ShortCircuit {
    pub fn new(value: i32, log: &Log) -> Self {
        Self {
            value,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl PipelineBehavior<Sum> for ShortCircuit {
    async fn handle(
        &self,
        _request: &Sum,
        _next: Next<'_, i32>,
        _cancel: &CancellationToken,
    ) -> FlowResult<i32> {
        self.log.push("short-circuit");
        Ok(self.value)
    }
}

// ── notification ───────────────────────────────────────────────────────────

pub struct Ping;

impl Notification for Ping {}

pub struct RecordingNotificationHandler {
    name: &'static str,
    log: Log,
}

impl RecordingNotificationHandler {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl NotificationHandler<Ping> for RecordingNotificationHandler {
    async fn handle(&self, _notification: &Ping, _cancel: &CancellationToken) -> FlowResult<()> {
        self.log.push(self.name);
        Ok(())
    }
}

pub struct FailingNotificationHandler {
    name: &'static str,
    log: Log,
}

impl FailingNotificationHandler {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl NotificationHandler<Ping> for FailingNotificationHandler {
    async fn handle(&self, _notification: &Ping, _cancel: &CancellationToken) -> FlowResult<()> {
        self.log.push(format!("{}-failed", self.name));
        Err(FlowError::handler(format!("{} failed", self.name)))
    }
}

// ── stream ─────────────────────────────────────────────────────────────────

/// Counts down from `from` to 1.
pub struct Countdown {
    pub from: u32,
}

impl StreamRequest for Countdown {
    type Item = u32;
}

pub struct CountdownHandler {
    log: Log,
    produced: Counter,
}

impl CountdownHandler {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            produced: Counter::default(),
        }
    }

    pub fn produced(&self) -> Counter {
        self.produced.clone()
    }
}

impl StreamRequestHandler<Countdown> for CountdownHandler {
    fn handle(
        &self,
        request: Arc<Countdown>,
        _cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<u32>> {
        self.log.push("countdown:open");
        let produced = self.produced.clone();
        stream::unfold(request.from, move |n| {
            let produced = produced.clone();
            async move {
                if n == 0 {
                    return None;
                }
                produced.bump();
                Some((Ok(n), n - 1))
            }
        })
        .boxed()
    }
}

/// Unbounded sequence 0, 1, 2, ... that stops once cancelled.
pub struct Naturals;

impl StreamRequest for Naturals {
    type Item = u64;
}

pub struct NaturalsHandler {
    produced: Counter,
}

impl NaturalsHandler {
    pub fn new() -> Self {
        Self {
            produced: Counter::default(),
        }
    }

    pub fn produced(&self) -> Counter {
        self.produced.clone()
    }
}

impl StreamRequestHandler<Naturals> for NaturalsHandler {
    fn handle(
        &self,
        _request: Arc<Naturals>,
        cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<u64>> {
        let produced = self.produced.clone();
        stream::unfold(0u64, move |n| {
            let produced = produced.clone();
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return None;
                }
                produced.bump();
                Some((Ok(n), n + 1))
            }
        })
        .boxed()
    }
}

pub struct Doubling;

impl StreamPipelineBehavior<Countdown> for Doubling {
    fn handle(
        &self,
        _request: Arc<Countdown>,
        next: StreamNext<u32>,
        _cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<u32>> {
        next.run().map(|item| item.map(|n| n * 2)).boxed()
    }
}

pub struct EvenOnly;

impl StreamPipelineBehavior<Countdown> for EvenOnly {
    fn handle(
        &self,
        _request: Arc<Countdown>,
        next: StreamNext<u32>,
        _cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<u32>> {
        next.run()
            .filter(|item| futures::future::ready(!matches!(item, Ok(n) if n % 2 == 1)))
            .boxed()
    }
}

/// Logs `<name>:open` when the layer is built.
pub struct RecordingStreamBehavior {
    name: String,
    log: Log,
}

impl RecordingStreamBehavior {
    pub fn new(name: impl Into<String>, log: &Log) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl<S: StreamRequest> StreamPipelineBehavior<S> for RecordingStreamBehavior {
    fn handle(
        &self,
        _request: Arc<S>,
        next: StreamNext<S::Item>,
        _cancel: CancellationToken,
    ) -> BoxStream<'static, FlowResult<S::Item>> {
        self.log.push(format!("{}:open", self.name));
        next.run()
    }
}
