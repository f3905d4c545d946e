//! Resolver port - capability から実装インスタンスを引く
//!
//! dispatch core は resolver を「使う」だけで、登録や生存期間の管理はしません。
//! capability は `dyn RequestHandler<Sum>` のような trait object 型です。

use std::any::type_name;
use std::sync::Arc;

use crate::domain::errors::{FlowError, FlowResult};

/// Resolver は capability 型をキーに実装を返す
///
/// # 順序の契約
/// - `resolve_many` の返す順序は 1 プロセス内で安定していること
/// - behavior の実行順・notification の配信順はこの順序そのもの
///
/// # Object Safety
/// メソッドがジェネリックなので `dyn Resolver` にはできません。
/// dispatcher は `Res: Resolver` で静的にパラメータ化されます。
pub trait Resolver: Send + Sync + 'static {
    /// All implementations of `C`, in registration order. Possibly empty.
    fn resolve_many<C>(&self) -> Vec<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static;

    /// Exactly one implementation of `C`.
    ///
    /// Zero is `HandlerNotFound`, more than one is `AmbiguousHandler`;
    /// the first one is never picked silently.
    fn resolve_one<C>(&self) -> FlowResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let mut found = self.resolve_many::<C>();
        match found.len() {
            0 => Err(FlowError::HandlerNotFound {
                capability: type_name::<C>(),
            }),
            1 => found.pop().ok_or(FlowError::HandlerNotFound {
                capability: type_name::<C>(),
            }),
            count => Err(FlowError::AmbiguousHandler {
                capability: type_name::<C>(),
                count,
            }),
        }
    }
}

impl<T: Resolver> Resolver for Arc<T> {
    fn resolve_many<C>(&self) -> Vec<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        (**self).resolve_many::<C>()
    }

    fn resolve_one<C>(&self) -> FlowResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        (**self).resolve_one::<C>()
    }
}
