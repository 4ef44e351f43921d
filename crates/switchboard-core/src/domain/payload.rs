//! RawPayload - 型タグ付きの生 payload
//!
//! dispatch 時に渡される値。中身は `Box<dyn Any + Send>` で、
//! 生成時の型を `PayloadType` として一緒に持ちます。
//! 取り出しは `downcast()` のみで、失敗しても値は失われません。

use std::any::Any;
use std::fmt;

use serde::Serialize;

use super::key::PayloadType;

pub struct RawPayload {
    value: Box<dyn Any + Send>,
    payload_type: PayloadType,
}

impl RawPayload {
    /// メモリ上の値をそのまま包む
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            payload_type: PayloadType::of::<T>(),
        }
    }

    /// バイト列を包む（JsonTransport などが受け付ける形）
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes.into())
    }

    /// `value` を JSON bytes にエンコード
    pub fn json<S: Serialize + ?Sized>(value: &S) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self::bytes)
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload_type.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// 値を `T` として取り出す。失敗時は payload をそのまま返す
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let payload_type = self.payload_type;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                value,
                payload_type,
            }),
        }
    }
}

impl fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPayload")
            .field("payload_type", &self.payload_type)
            .finish_non_exhaustive()
    }
}
