//! Errors - エラー型と分類
//!
//! 失敗はすべて `Result` として呼び出し元に返します。
//! core の中でログに落として握りつぶしたり、リトライしたりはしません。

use std::error::Error as StdError;

use super::key::PayloadType;

/// handler が返すエラー型。dispatch の呼び出し元にそのまま返る
pub type HandlerError = Box<dyn StdError + Send + Sync + 'static>;

/// ErrorKind は運用向けの分類
///
/// - Configuration: 登録時の誤り（二重登録、型の食い違い）
/// - Routing: 未登録キーへの dispatch
/// - Contract: producer / consumer 間の型の食い違い
/// - Decode: bytes の形式エラー
/// - Handler: handler 自身が返したエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Routing,
    Contract,
    Decode,
    Handler,
}

/// RouteError は登録時のエラー（テーブルは変更されない）
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("duplicate route definition for event {key}")]
    DuplicateRouteDef { key: String },

    #[error("event {key} declares payload {declared} but the handler expects {handler}")]
    PayloadTypeMismatch {
        key: String,
        declared: PayloadType,
        handler: PayloadType,
    },
}

impl RouteError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// TransportError は transport のデコードエラー
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("event data type mismatch: expected {expected}, got {actual}")]
    DataTypeMismatch {
        expected: PayloadType,
        actual: PayloadType,
    },

    #[error("malformed input for {expected}: expected a byte buffer, got {actual}")]
    MalformedInput {
        expected: PayloadType,
        actual: PayloadType,
    },

    #[error("payload of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// crate 外のデコーダ（バイナリ形式など）のエラー
    #[error("{0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::DataTypeMismatch { .. } => ErrorKind::Contract,
            TransportError::MalformedInput { .. }
            | TransportError::PayloadTooLarge { .. }
            | TransportError::Json(_)
            | TransportError::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// DispatchError は dispatch のエラー（評価順: lookup → decode → handler）
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no such event: {key}")]
    NoSuchEvent { key: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("handler failed: {0}")]
    Handler(#[source] HandlerError),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::NoSuchEvent { .. } => ErrorKind::Routing,
            DispatchError::Transport(err) => err.kind(),
            DispatchError::Handler(_) => ErrorKind::Handler,
        }
    }

    /// handler で止まった場合、handler が返したエラー
    pub fn handler_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            DispatchError::Handler(err) => Some(&**err),
            _ => None,
        }
    }

    pub fn into_handler_error(self) -> Result<HandlerError, Self> {
        match self {
            DispatchError::Handler(err) => Ok(err),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::User;
    use rstest::rstest;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("quota exceeded for {0}")]
    struct QuotaExceeded(String);

    fn json_error() -> serde_json::Error {
        serde_json::from_slice::<User>(b"{").unwrap_err()
    }

    #[rstest]
    #[case::no_such_event(DispatchError::NoSuchEvent { key: "UserCreated".into() }, ErrorKind::Routing)]
    #[case::mismatch(
        DispatchError::Transport(TransportError::DataTypeMismatch {
            expected: PayloadType::of::<User>(),
            actual: PayloadType::of::<i32>(),
        }),
        ErrorKind::Contract
    )]
    #[case::malformed(
        DispatchError::Transport(TransportError::MalformedInput {
            expected: PayloadType::of::<User>(),
            actual: PayloadType::of::<i32>(),
        }),
        ErrorKind::Decode
    )]
    #[case::json(DispatchError::Transport(json_error().into()), ErrorKind::Decode)]
    #[case::handler(DispatchError::Handler("boom".into()), ErrorKind::Handler)]
    fn dispatch_errors_are_classified(#[case] err: DispatchError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn route_errors_are_configuration_errors() {
        let err = RouteError::DuplicateRouteDef {
            key: "UserCreated".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "duplicate route definition for event UserCreated"
        );
    }

    #[test]
    fn json_errors_display_verbatim() {
        let err = json_error();
        let message = err.to_string();
        assert_eq!(TransportError::from(err).to_string(), message);
    }

    #[test]
    fn handler_error_comes_back_unchanged() {
        let err = DispatchError::Handler(Box::new(QuotaExceeded("usr_001".into())));
        assert!(err.handler_error().is_some());

        let inner = err.into_handler_error().unwrap();
        let quota = inner.downcast::<QuotaExceeded>().unwrap();
        assert_eq!(*quota, QuotaExceeded("usr_001".into()));
    }

    #[test]
    fn non_handler_errors_are_not_handler_errors() {
        let err = DispatchError::NoSuchEvent { key: "x".into() };
        assert!(err.handler_error().is_none());
        assert!(err.into_handler_error().is_err());
    }
}
