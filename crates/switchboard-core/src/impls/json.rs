//! JsonTransport - JSON bytes を handler の型にデコードする Transport
//!
//! # デシリアライズフロー
//! 1. payload が `Vec<u8>` であることを確認（違えば MalformedInput）
//! 2. 上限が設定されていればサイズをチェック（超えれば PayloadTooLarge）
//! 3. serde_json で T にデシリアライズ（エラーはそのまま返す）
//!
//! 成功時は新しく作った `T` を所有権ごと handler に渡します。

use serde::de::DeserializeOwned;

use crate::domain::{PayloadType, RawPayload, TransportError};
use crate::ports::Transport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonTransport {
    max_payload_bytes: Option<usize>,
}

impl JsonTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `limit` バイトを超える payload をパース前に弾く
    pub fn with_limit(limit: usize) -> Self {
        Self {
            max_payload_bytes: Some(limit),
        }
    }

    pub fn max_payload_bytes(&self) -> Option<usize> {
        self.max_payload_bytes
    }
}

impl<T: DeserializeOwned + Send + 'static> Transport<T> for JsonTransport {
    fn decode(&self, raw: RawPayload, expected: PayloadType) -> Result<T, TransportError> {
        let bytes = raw
            .downcast::<Vec<u8>>()
            .map_err(|raw| TransportError::MalformedInput {
                expected,
                actual: raw.payload_type(),
            })?;

        if let Some(limit) = self.max_payload_bytes
            && bytes.len() > limit
        {
            return Err(TransportError::PayloadTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
