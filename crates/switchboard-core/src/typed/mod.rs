//! Typed - 型付き route API
//!
//! handler の payload 型を静的に決め、キーが宣言する型との対応を登録時に保証します。
//!
//! # 二層構造
//! - **表層（Typed）**: `Handler<D, T>` trait - 型安全
//! - **内部（Dyn）**: `DynRoute<D>` trait - object-safe, type erasure
//! - **RouteTable**: 型消去したキーと route の対応表

pub mod handler;
pub mod registry;

pub use self::handler::{Dependencies, DynRoute, Handler, TypedRoute};
pub use self::registry::RouteTable;
