//! Router - RouteTable と依存バンドルをまとめた表面 API
//!
//! # 二つの形
//! - **Router<D>**: 構築時に渡した依存 `D` を、全 handler に `Arc<D>` で渡す
//! - **DependencyFreeRouter**: 依存なし。中身は `Router<()>` への委譲のみ
//!
//! グローバルな登録表は持ちません。router は組み立てる側が所有し、参照で配ります。

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, debug_span};

use crate::domain::{
    DispatchError, EventContext, EventKey, HandlerError, RawPayload, RouteError, describe,
};
use crate::impls::IdentityTransport;
use crate::ports::Transport;
use crate::typed::{Dependencies, Handler, RouteTable};

use super::config::RouterConfig;

/// Router は型付き handler の登録と dispatch を行う
///
/// # 使用例
/// ```ignore
/// let router = Router::new(AppDeps::connect(&settings)?);
/// router.define_json_event(CatalogEvent::UserCreated, WelcomeMailer)?;
///
/// router
///     .dispatch(&CatalogEvent::UserCreated, RawPayload::bytes(body))
///     .await?;
/// ```
pub struct Router<D: Dependencies> {
    routes: RouteTable<D>,
    deps: Arc<D>,
    config: RouterConfig,
}

impl<D: Dependencies> Router<D> {
    pub fn new(deps: D) -> Self {
        Self::with_config(deps, RouterConfig::default())
    }

    pub fn with_config(deps: D, config: RouterConfig) -> Self {
        Self {
            routes: RouteTable::new(),
            deps: Arc::new(deps),
            config,
        }
    }

    /// transport を明示して handler を登録
    pub fn define_event<K, T, Tr, H>(&self, key: K, transport: Tr, handler: H) -> Result<(), RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        Tr: Transport<T>,
        H: Handler<D, T>,
    {
        let key_name = describe(&key);
        let transport_name = Transport::<T>::name(&transport);

        match self.routes.register(key, transport, handler) {
            Ok(()) => {
                debug!(
                    router = %self.config.name,
                    key = %key_name,
                    transport = transport_name,
                    "route registered"
                );
                Ok(())
            }
            Err(err) => {
                debug!(
                    router = %self.config.name,
                    key = %key_name,
                    error = %err,
                    "route rejected"
                );
                Err(err)
            }
        }
    }

    /// JSON bytes で届く payload 用の handler を登録
    pub fn define_json_event<K, T, H>(&self, key: K, handler: H) -> Result<(), RouteError>
    where
        K: EventKey,
        T: DeserializeOwned + Send + 'static,
        H: Handler<D, T>,
    {
        self.define_event::<K, T, _, H>(key, self.config.json_transport(), handler)
    }

    /// 型付きの値のまま届く payload 用の handler を登録
    pub fn define_untransported_event<K, T, H>(&self, key: K, handler: H) -> Result<(), RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        H: Handler<D, T>,
    {
        self.define_event::<K, T, _, H>(key, IdentityTransport, handler)
    }

    pub async fn dispatch<K: EventKey>(&self, key: &K, raw: RawPayload) -> Result<(), DispatchError> {
        self.dispatch_with_context(EventContext::new(), key, raw).await
    }

    /// 呼び出し側のコンテキストで dispatch（キャンセル、ネストした dispatch 用）
    pub async fn dispatch_with_context<K: EventKey>(
        &self,
        ctx: EventContext,
        key: &K,
        raw: RawPayload,
    ) -> Result<(), DispatchError> {
        let span = debug_span!(
            "dispatch",
            router = %self.config.name,
            key = ?key,
            dispatch_id = %ctx.dispatch_id()
        );

        async move {
            let result = self
                .routes
                .dispatch(ctx, key, raw, Arc::clone(&self.deps))
                .await;
            match &result {
                Ok(()) => debug!("event dispatched"),
                Err(err) => debug!(kind = ?err.kind(), error = %err, "dispatch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// メモリ上の値を RawPayload に包んで dispatch
    pub async fn dispatch_value<K, V>(&self, key: &K, value: V) -> Result<(), DispatchError>
    where
        K: EventKey,
        V: Any + Send,
    {
        self.dispatch(key, RawPayload::new(value)).await
    }

    pub fn deps(&self) -> &Arc<D> {
        &self.deps
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable<D> {
        &self.routes
    }
}

/// 依存を持たない Router
///
/// handler は `(EventContext, T)` を受け取るだけ。
/// 実装は `Router<()>` への委譲で、dispatch のアルゴリズムは共通です。
pub struct DependencyFreeRouter {
    inner: Router<()>,
}

impl DependencyFreeRouter {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            inner: Router::with_config((), config),
        }
    }

    pub fn define_event<K, T, Tr, F, Fut>(&self, key: K, transport: Tr, handler: F) -> Result<(), RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        Tr: Transport<T>,
        F: Fn(EventContext, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.inner.define_event::<K, T, Tr, _>(
            key,
            transport,
            move |ctx: EventContext, _deps: Arc<()>, event: T| handler(ctx, event),
        )
    }

    pub fn define_json_event<K, T, F, Fut>(&self, key: K, handler: F) -> Result<(), RouteError>
    where
        K: EventKey,
        T: DeserializeOwned + Send + 'static,
        F: Fn(EventContext, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.define_event::<K, T, _, F, Fut>(key, self.inner.config().json_transport(), handler)
    }

    pub fn define_untransported_event<K, T, F, Fut>(&self, key: K, handler: F) -> Result<(), RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        F: Fn(EventContext, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.define_event::<K, T, _, F, Fut>(key, IdentityTransport, handler)
    }

    pub async fn dispatch<K: EventKey>(&self, key: &K, raw: RawPayload) -> Result<(), DispatchError> {
        self.inner.dispatch(key, raw).await
    }

    pub async fn dispatch_with_context<K: EventKey>(
        &self,
        ctx: EventContext,
        key: &K,
        raw: RawPayload,
    ) -> Result<(), DispatchError> {
        self.inner.dispatch_with_context(ctx, key, raw).await
    }

    pub async fn dispatch_value<K, V>(&self, key: &K, value: V) -> Result<(), DispatchError>
    where
        K: EventKey,
        V: Any + Send,
    {
        self.inner.dispatch_value(key, value).await
    }

    pub fn config(&self) -> &RouterConfig {
        self.inner.config()
    }

    pub fn routes(&self) -> &RouteTable<()> {
        self.inner.routes()
    }
}

impl Default for DependencyFreeRouter {
    fn default() -> Self {
        Self::new()
    }
}
