//! Transport port - 生 payload を handler の型へ変換する
//!
//! # 設計
//! - メソッドは `decode` の 1 つだけ
//! - route 登録時に 1 度だけ選ばれ、その route では以後変わらない
//! - 副作用なし、状態なし（`Send + Sync` で全 dispatch から共有）
//!
//! 組み込み実装は `impls` にあります（IdentityTransport, JsonTransport）。
//! `Fn(RawPayload, PayloadType) -> Result<T, TransportError>` もそのまま Transport として使えます。

use crate::domain::{PayloadType, RawPayload, TransportError};

/// Transport は RawPayload を handler の型 `T` にデコードする
///
/// `expected` はこの dispatch でキーが宣言した型。
/// RouteTable は宣言型が `T` のキーにしか transport を束縛しない。
pub trait Transport<T>: Send + Sync + 'static {
    fn decode(&self, raw: RawPayload, expected: PayloadType) -> Result<T, TransportError>;

    /// ログ用の短い名前
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T, F> Transport<T> for F
where
    F: Fn(RawPayload, PayloadType) -> Result<T, TransportError> + Send + Sync + 'static,
{
    fn decode(&self, raw: RawPayload, expected: PayloadType) -> Result<T, TransportError> {
        self(raw, expected)
    }
}
