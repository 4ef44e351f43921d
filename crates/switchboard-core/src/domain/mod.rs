//! Domain model (keys, payloads, context, errors).

pub mod context;
pub mod errors;
pub mod key;
pub mod payload;

pub use self::context::EventContext;
pub use self::errors::{DispatchError, ErrorKind, HandlerError, RouteError, TransportError};
pub use self::key::{EventKey, PayloadType};
pub use self::payload::RawPayload;

pub(crate) use self::key::{AnyKey, ErasedKey, describe};
