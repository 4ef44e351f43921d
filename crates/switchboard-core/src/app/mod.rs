//! App - アプリケーション層
//!
//! RouteTable と依存バンドル、設定を束ねて、利用者が触る API を提供します。
//!
//! # 主要コンポーネント
//! - **Router**: 依存 `D` を持つ router
//! - **DependencyFreeRouter**: 依存を持たない router（`Router<()>` への委譲）
//! - **RouterBuilder**: 登録と起動時検証（expect_event → build）
//! - **RouterConfig**: router 名と JSON payload の上限

pub mod builder;
pub mod config;
pub mod router;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, RouterBuilder};
pub use self::config::RouterConfig;
pub use self::router::{DependencyFreeRouter, Router};
