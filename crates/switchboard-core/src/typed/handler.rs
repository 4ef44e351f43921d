//! Handler trait - 型付き handler と、その型消去
//!
//! # 二層構造
//! - **表層（Typed）**: `Handler<D, T>` - payload 型 `T` と依存 `D` が静的に決まる
//! - **内部（Dyn）**: `DynRoute<D>` - object-safe。RouteTable に `Arc<dyn DynRoute<D>>` で格納
//!
//! `TypedRoute<T, Tr, H>` が Transport と Handler を 1 つにまとめ、
//! `RawPayload` → `T` のデコードと handler 呼び出しを行います。

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DispatchError, EventContext, HandlerError, PayloadType, RawPayload};
use crate::ports::Transport;

/// router が handler に渡す依存バンドルの境界
pub trait Dependencies: Send + Sync + 'static {}

impl<D: Send + Sync + 'static> Dependencies for D {}

/// Handler は decode 済みの payload を受け取って処理する
///
/// # 使用例
/// ```ignore
/// struct WelcomeMailer;
///
/// #[async_trait]
/// impl Handler<AppDeps, User> for WelcomeMailer {
///     async fn handle(&self, ctx: EventContext, deps: Arc<AppDeps>, user: User) -> Result<(), HandlerError> {
///         deps.mailer.send_welcome(&user.id).await?;
///         Ok(())
///     }
/// }
/// ```
///
/// `Fn(EventContext, Arc<D>, T) -> impl Future<Output = Result<(), HandlerError>>`
/// を満たす関数・クロージャも Handler になります。
#[async_trait]
pub trait Handler<D: Dependencies, T: Send + 'static>: Send + Sync + 'static {
    async fn handle(&self, ctx: EventContext, deps: Arc<D>, event: T) -> Result<(), HandlerError>;
}

#[async_trait]
impl<D, T, F, Fut> Handler<D, T> for F
where
    D: Dependencies,
    T: Send + 'static,
    F: Fn(EventContext, Arc<D>, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, ctx: EventContext, deps: Arc<D>, event: T) -> Result<(), HandlerError> {
        (self)(ctx, deps, event).await
    }
}

/// DynRoute は型消去された route（decode と handler 呼び出しを 1 つにまとめる）
#[async_trait]
pub trait DynRoute<D: Dependencies>: Send + Sync {
    async fn invoke(
        &self,
        ctx: EventContext,
        deps: Arc<D>,
        raw: RawPayload,
        expected: PayloadType,
    ) -> Result<(), DispatchError>;

    /// handler が受け取る payload 型
    fn payload_type(&self) -> PayloadType;

    fn transport_name(&self) -> &'static str;
}

/// 1 つのキーに束縛された (transport, handler) の組。登録後は変わらない
pub struct TypedRoute<T, Tr, H> {
    transport: Tr,
    handler: H,
    _marker: PhantomData<fn() -> T>,
}

impl<T, Tr, H> TypedRoute<T, Tr, H> {
    pub fn new(transport: Tr, handler: H) -> Self {
        Self {
            transport,
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<D, T, Tr, H> DynRoute<D> for TypedRoute<T, Tr, H>
where
    D: Dependencies,
    T: Send + 'static,
    Tr: Transport<T>,
    H: Handler<D, T>,
{
    async fn invoke(
        &self,
        ctx: EventContext,
        deps: Arc<D>,
        raw: RawPayload,
        expected: PayloadType,
    ) -> Result<(), DispatchError> {
        // decode に失敗したら handler は呼ばない
        let event = Transport::<T>::decode(&self.transport, raw, expected)?;
        Handler::<D, T>::handle(&self.handler, ctx, deps, event)
            .await
            .map_err(DispatchError::Handler)
    }

    fn payload_type(&self) -> PayloadType {
        PayloadType::of::<T>()
    }

    fn transport_name(&self) -> &'static str {
        Transport::<T>::name(&self.transport)
    }
}
