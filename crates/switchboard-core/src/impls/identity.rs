//! IdentityTransport - 変換しない Transport
//!
//! producer がすでに正しい型の値をメモリ上で渡してくるケース用。
//! 実行時の型が宣言された型と完全に一致するときだけ通します。

use std::any::Any;

use crate::domain::{PayloadType, RawPayload, TransportError};
use crate::ports::Transport;

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransport;

impl<T: Any + Send> Transport<T> for IdentityTransport {
    fn decode(&self, raw: RawPayload, expected: PayloadType) -> Result<T, TransportError> {
        let actual = raw.payload_type();
        if actual != expected {
            return Err(TransportError::DataTypeMismatch { expected, actual });
        }
        raw.downcast::<T>()
            .map_err(|raw| TransportError::DataTypeMismatch {
                expected: PayloadType::of::<T>(),
                actual: raw.payload_type(),
            })
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}
