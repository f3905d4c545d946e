//! Errors - エラー型と分類
//!
//! - 解決エラー: HandlerNotFound / AmbiguousHandler（呼び出しに致命的、リトライしない）
//! - 実行エラー: handler / behavior が返したエラーはそのまま呼び出し元へ
//! - Cancelled: 失敗ではなく協調的キャンセルを観測した段が返す

use thiserror::Error;

/// FlowError is the single error type crossing the dispatch core.
///
/// The core never rewraps an error coming out of a handler or behavior:
/// whatever value the stage returned is what the caller observes.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("handler not found for {capability}")]
    HandlerNotFound { capability: &'static str },

    #[error("ambiguous handler for {capability}: {count} registered, exactly one expected")]
    AmbiguousHandler {
        capability: &'static str,
        count: usize,
    },

    #[error("handler failed: {0}")]
    Handler(String),

    #[error("behavior failed: {0}")]
    Behavior(String),

    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A stage observed the cancellation signal and stopped.
    #[error("operation cancelled")]
    Cancelled,
}

impl FlowError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    pub fn behavior(message: impl Into<String>) -> Self {
        Self::Behavior(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// True for configuration problems found while resolving a handler.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotFound { .. } | Self::AmbiguousHandler { .. }
        )
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
