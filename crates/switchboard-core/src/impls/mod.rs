//! Impls - 組み込みの Transport 実装
//!
//! # 含まれる実装
//! - **IdentityTransport**: 型が完全一致する値をそのまま渡す
//! - **JsonTransport**: JSON bytes を serde_json でデコードする
//!
//! バイナリ形式などは利用側で `Transport` を実装して追加します。

pub mod identity;
pub mod json;

pub use self::identity::IdentityTransport;
pub use self::json::JsonTransport;
