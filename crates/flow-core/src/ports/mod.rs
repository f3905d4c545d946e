//! Ports - 外部協調者への抽象化レイヤー
//!
//! dispatch core が外から受け取るのは resolver だけです。

pub mod resolver;

pub use self::resolver::Resolver;
