//! MediatorBuilder - Mediator の構築と起動時検証
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - ジェネリック関数から `fn` ポインタを作って型情報を持ち運ぶ

use std::sync::Arc;

use tracing::info;

use super::cache::HandlerCache;
use super::mediator::Mediator;
use crate::domain::message::{Request, StreamRequest, message_name};
use crate::ports::Resolver;
use crate::typed::{RequestHandler, StreamRequestHandler};

/// MediatorBuilder はアプリケーション起動時に Mediator を組み立てる
///
/// # 使用例
/// ```ignore
/// let mediator = MediatorBuilder::new(resolver)
///     .expect_request::<Sum>()
///     .expect_stream::<Countdown>()
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_request / expect_stream で「handler がちょうど 1 つあるべき型」を登録
/// - build() 時に resolver へ問い合わせて数を確認
/// - 0 個なら MissingHandlers、2 個以上なら AmbiguousHandlers
pub struct MediatorBuilder<Res> {
    resolver: Res,
    cache: Option<Arc<HandlerCache>>,
    expectations: Vec<Expectation<Res>>,
}

struct Expectation<Res> {
    message: &'static str,
    count: fn(&Res) -> usize,
}

/// BuildError は Mediator 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing handlers: {0:?}. These messages were expected but have no handler.")]
    MissingHandlers(Vec<&'static str>),

    #[error("Ambiguous handlers: {0:?}. These messages have more than one handler.")]
    AmbiguousHandlers(Vec<&'static str>),
}

impl<Res: Resolver> MediatorBuilder<Res> {
    pub fn new(resolver: Res) -> Self {
        Self {
            resolver,
            cache: None,
            expectations: Vec::new(),
        }
    }

    /// Share an existing handler cache instead of creating a fresh one.
    pub fn handler_cache(mut self, cache: Arc<HandlerCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn expect_request<R: Request>(mut self) -> Self {
        self.expectations.push(Expectation {
            message: message_name::<R>(),
            count: |resolver| resolver.resolve_many::<dyn RequestHandler<R>>().len(),
        });
        self
    }

    pub fn expect_stream<S: StreamRequest>(mut self) -> Self {
        self.expectations.push(Expectation {
            message: message_name::<S>(),
            count: |resolver| resolver.resolve_many::<dyn StreamRequestHandler<S>>().len(),
        });
        self
    }

    /// Validate expectations and build the mediator.
    ///
    /// Missing handlers are reported before ambiguous ones.
    pub fn build(self) -> Result<Mediator<Res>, BuildError> {
        let mut missing = Vec::new();
        let mut ambiguous = Vec::new();
        for expectation in &self.expectations {
            match (expectation.count)(&self.resolver) {
                0 => missing.push(expectation.message),
                1 => {}
                _ => ambiguous.push(expectation.message),
            }
        }
        if !missing.is_empty() {
            return Err(BuildError::MissingHandlers(missing));
        }
        if !ambiguous.is_empty() {
            return Err(BuildError::AmbiguousHandlers(ambiguous));
        }

        info!(expectations = self.expectations.len(), "mediator built");
        let cache = self.cache.unwrap_or_default();
        Ok(Mediator::from_parts(Arc::new(self.resolver), cache))
    }
}
