//! NotificationDispatcher - 通知を全 handler へ順番に届ける
//!
//! - handler i+1 は handler i の完了後にだけ開始する（並列化しない）
//! - 失敗したらその場で中断し、残りの handler は呼ばない
//! - handler が 0 個なら何もせず成功

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, warn};

use crate::domain::errors::FlowResult;
use crate::domain::message::{Notification, message_name};
use crate::ports::Resolver;
use crate::typed::NotificationHandler;

pub struct NotificationDispatcher<Res> {
    resolver: Arc<Res>,
}

impl<Res: Resolver> NotificationDispatcher<Res> {
    pub fn new(resolver: Arc<Res>) -> Self {
        Self { resolver }
    }

    pub async fn dispatch<N: Notification>(
        &self,
        notification: &N,
        cancel: &CancellationToken,
    ) -> FlowResult<()> {
        let span = debug_span!("flow.publish", message = message_name::<N>());
        async {
            let handlers = self.resolver.resolve_many::<dyn NotificationHandler<N>>();
            debug!(handlers = handlers.len(), "publishing notification");

            for (index, handler) in handlers.iter().enumerate() {
                if let Err(err) = handler.handle(notification, cancel).await {
                    warn!(
                        handler = index,
                        skipped = handlers.len() - index - 1,
                        error = %err,
                        "notification handler failed, remaining handlers skipped"
                    );
                    return Err(err);
                }
            }
            Ok(())
        }
        .instrument(span)
        .await
    }
}

impl<Res> Clone for NotificationDispatcher<Res> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}
