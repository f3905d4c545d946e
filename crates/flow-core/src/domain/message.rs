//! Message - 3 種類のメッセージ形状
//!
//! メッセージの「形」を trait で表現し、どの dispatcher に届くかを
//! コンパイル時に決めます。
//!
//! # 学習ポイント
//! - Associated Types (`type Response`, `type Item`)
//! - Marker trait による形状の静的な区別
//! - Trait bounds (Send + Sync + 'static) と `Arc` / `TypeId` の関係

/// Request は 1 つの handler に届き、1 つの応答を返す
///
/// # 使用例
/// ```ignore
/// struct Sum {
///     a: i32,
///     b: i32,
/// }
///
/// impl Request for Sum {
///     type Response = i32;
/// }
/// ```
///
/// # Trait Bounds
/// - `Send + Sync`: pipeline の各段から `&R` として共有されるため
/// - `'static`: `TypeId` でキャッシュのキーにするため
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;
}

/// Notification は 0 個以上の handler に順番に届く（応答なし）
pub trait Notification: Send + Sync + 'static {}

/// StreamRequest は 1 つの handler に届き、遅延シーケンスを返す
///
/// `Item` はシーケンスの要素型。シーケンスは有限でも無限でもよい。
pub trait StreamRequest: Send + Sync + 'static {
    type Item: Send + 'static;
}

/// Human readable name of a message type, used in logs and errors.
pub fn message_name<M: ?Sized + 'static>() -> &'static str {
    std::any::type_name::<M>()
}
