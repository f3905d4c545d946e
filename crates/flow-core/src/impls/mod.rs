//! Impls - ポートの実装（開発・テスト用）
//!
//! - InMemoryResolver: 登録順を保つ型付きレジストリ

pub mod registry;

pub use self::registry::{InMemoryResolver, RegistryError};
