//! switchboard-core
//!
//! In-process typed event dispatch: bind an event key to a transport and a
//! handler once, then dispatch raw payloads against the key.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（EventKey, PayloadType, RawPayload, EventContext, errors）
//! - **ports**: 抽象化レイヤー（Transport）
//! - **impls**: 実装（IdentityTransport, JsonTransport）
//! - **typed**: 型付き handler API（Handler trait, TypedRoute, RouteTable）
//! - **app**: 表面 API（Router, DependencyFreeRouter, RouterBuilder, RouterConfig）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod typed;
pub mod app;

#[cfg(test)]
mod testing;

pub use crate::app::{BuildError, DependencyFreeRouter, Router, RouterBuilder, RouterConfig};
pub use crate::domain::{
    DispatchError, ErrorKind, EventContext, EventKey, HandlerError, PayloadType, RawPayload,
    RouteError, TransportError,
};
pub use crate::impls::{IdentityTransport, JsonTransport};
pub use crate::ports::Transport;
pub use crate::typed::{Dependencies, Handler};
