//! Typed - handler / behavior の型付き API
//!
//! - **handler**: `RequestHandler<R>`, `NotificationHandler<N>`, `StreamRequestHandler<S>`
//! - **behavior**: `PipelineBehavior<R>`, `StreamPipelineBehavior<S>` と continuation 型
//!
//! どの trait も `dyn Trait<M>` の形で resolver から取り出されます。

pub mod behavior;
pub mod handler;

pub use self::behavior::{Next, PipelineBehavior, StreamNext, StreamPipelineBehavior};
pub use self::handler::{NotificationHandler, RequestHandler, StreamRequestHandler};
