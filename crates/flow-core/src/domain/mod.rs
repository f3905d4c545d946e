//! Domain model (message shapes, errors).

pub mod errors;
pub mod message;

pub use self::errors::{FlowError, FlowResult};
pub use self::message::{Notification, Request, StreamRequest, message_name};
