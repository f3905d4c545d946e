//! InMemoryResolver - 開発・テスト用の Resolver 実装
//!
//! # 学習ポイント
//! - `TypeId` をキーにした HashMap で型消去された値を管理
//! - `Box<dyn Any>` に `Vec<Arc<C>>` を入れ、取り出すときに downcast
//! - 登録順 = 解決順（behavior の実行順がそのまま決まる）
//!
//! 本番の登録・ブートストラップ機構はこの crate の外側の責務です。

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::message::{Notification, Request, StreamRequest, message_name};
use crate::ports::Resolver;
use crate::typed::{
    NotificationHandler, PipelineBehavior, RequestHandler, StreamPipelineBehavior,
    StreamRequestHandler,
};

/// InMemoryResolver は capability ごとに実装のリストを保持
///
/// # 使用例
/// ```ignore
/// let mut resolver = InMemoryResolver::new();
/// resolver
///     .add_request_handler::<Sum, _>(SumHandler)
///     .add_behavior::<Sum, _>(Logging);
///
/// let mediator = Mediator::new(resolver);
/// ```
///
/// # 内部実装
/// - `HashMap<TypeId, Box<dyn Any + Send + Sync>>`
/// - 値は常に `Vec<Arc<C>>`（キーは `TypeId::of::<C>()`）
#[derive(Default)]
pub struct InMemoryResolver {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

/// RegistryError は登録時のエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Handler for message '{0}' is already registered")]
    AlreadyRegistered(&'static str),
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Append an implementation of capability `C`.
    pub fn add<C>(&mut self, instance: Arc<C>) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let slot = self
            .entries
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(Vec::<Arc<C>>::new()));
        if let Some(list) = slot.downcast_mut::<Vec<Arc<C>>>() {
            list.push(instance);
        }
        self
    }

    /// Number of implementations registered for `C`.
    pub fn count<C>(&self) -> usize
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.list::<C>().map_or(0, Vec::len)
    }

    pub fn add_request_handler<R, H>(&mut self, handler: H) -> &mut Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.add(handler)
    }

    /// Like `add_request_handler`, but refuses a second handler for `R`.
    pub fn try_add_request_handler<R, H>(&mut self, handler: H) -> Result<&mut Self, RegistryError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        if self.count::<dyn RequestHandler<R>>() > 0 {
            return Err(RegistryError::AlreadyRegistered(message_name::<R>()));
        }
        Ok(self.add_request_handler::<R, H>(handler))
    }

    pub fn add_notification_handler<N, H>(&mut self, handler: H) -> &mut Self
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let handler: Arc<dyn NotificationHandler<N>> = Arc::new(handler);
        self.add(handler)
    }

    pub fn add_stream_handler<S, H>(&mut self, handler: H) -> &mut Self
    where
        S: StreamRequest,
        H: StreamRequestHandler<S> + 'static,
    {
        let handler: Arc<dyn StreamRequestHandler<S>> = Arc::new(handler);
        self.add(handler)
    }

    /// Behaviors run outermost-first in the order they are added.
    pub fn add_behavior<R, B>(&mut self, behavior: B) -> &mut Self
    where
        R: Request,
        B: PipelineBehavior<R> + 'static,
    {
        let behavior: Arc<dyn PipelineBehavior<R>> = Arc::new(behavior);
        self.add(behavior)
    }

    pub fn add_stream_behavior<S, B>(&mut self, behavior: B) -> &mut Self
    where
        S: StreamRequest,
        B: StreamPipelineBehavior<S> + 'static,
    {
        let behavior: Arc<dyn StreamPipelineBehavior<S>> = Arc::new(behavior);
        self.add(behavior)
    }

    /// Capability type names with at least one registration.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn list<C>(&self) -> Option<&Vec<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|slot| slot.downcast_ref::<Vec<Arc<C>>>())
    }
}

impl Resolver for InMemoryResolver {
    fn resolve_many<C>(&self) -> Vec<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let found = self.list::<C>().cloned().unwrap_or_default();
        tracing::trace!(capability = type_name::<C>(), count = found.len(), "resolved");
        found
    }
}
