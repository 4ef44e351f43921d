//! RouteTable - route の登録と dispatch
//!
//! # ロック
//! - テーブル全体に `RwLock` を 1 つ
//! - register: write lock の中で「存在チェック → 挿入」を行う（原子的）
//! - dispatch: read lock は `Arc<dyn DynRoute>` を clone する間だけ
//! - デコードと handler 実行はロックの外。遅い handler が他を止めない
//!
//! handler がロック中に走ることはないので、poison されたロックもそのまま使います。

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{
    AnyKey, DispatchError, ErasedKey, EventContext, EventKey, PayloadType, RawPayload, RouteError,
    describe,
};
use crate::ports::Transport;

use super::handler::{Dependencies, DynRoute, Handler, TypedRoute};

/// RouteTable は EventKey → (Transport, Handler) の対応表
///
/// # 使用例
/// ```ignore
/// let table = RouteTable::<AppDeps>::new();
/// table.register(CatalogEvent::UserCreated, JsonTransport::new(), WelcomeMailer)?;
///
/// table.dispatch(EventContext::new(), &CatalogEvent::UserCreated, raw, deps).await?;
/// ```
///
/// キーは型消去して保持するので、1 つのテーブルに複数のキー型を混在できます。
pub struct RouteTable<D: Dependencies> {
    routes: RwLock<HashMap<ErasedKey, Arc<dyn DynRoute<D>>>>,
}

impl<D: Dependencies> RouteTable<D> {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// `key` に `transport` と `handler` を登録する
    ///
    /// 登録済みのキー、またはキーが宣言する型と handler の型が違う場合は
    /// テーブルを変更せずにエラーを返す。
    pub fn register<K, T, Tr, H>(&self, key: K, transport: Tr, handler: H) -> Result<(), RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        Tr: Transport<T>,
        H: Handler<D, T>,
    {
        let declared = key.data_type();
        let accepted = PayloadType::of::<T>();
        if declared != accepted {
            return Err(RouteError::PayloadTypeMismatch {
                key: describe(&key),
                declared,
                handler: accepted,
            });
        }

        let route: Arc<dyn DynRoute<D>> = Arc::new(TypedRoute::<T, Tr, H>::new(transport, handler));

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        match routes.entry(ErasedKey::new(key)) {
            Entry::Occupied(existing) => Err(RouteError::DuplicateRouteDef {
                key: existing.key().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(route);
                Ok(())
            }
        }
    }

    /// `key` を引いて `raw` をデコードし、handler を実行する
    pub async fn dispatch<K: EventKey>(
        &self,
        ctx: EventContext,
        key: &K,
        raw: RawPayload,
        deps: Arc<D>,
    ) -> Result<(), DispatchError> {
        let route = self.lookup(key).ok_or_else(|| DispatchError::NoSuchEvent {
            key: describe(key),
        })?;

        route.invoke(ctx, deps, raw, key.data_type()).await
    }

    /// `key` の route を返す（read lock は返す前に解放済み）
    pub fn lookup<K: EventKey>(&self, key: &K) -> Option<Arc<dyn DynRoute<D>>> {
        let probe: &(dyn AnyKey + 'static) = key;
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.get(probe).cloned()
    }

    pub fn contains<K: EventKey>(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    pub(crate) fn contains_erased(&self, key: &ErasedKey) -> bool {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.routes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 登録済みキーの `Debug` 表現（ソート済み）
    pub fn registered_keys(&self) -> Vec<String> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = routes.keys().map(ToString::to_string).collect();
        keys.sort();
        keys
    }
}

impl<D: Dependencies> Default for RouteTable<D> {
    fn default() -> Self {
        Self::new()
    }
}
