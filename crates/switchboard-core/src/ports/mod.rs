//! Ports - 抽象化レイヤー
//!
//! payload のデコード方式を差し替え可能にするための trait を置きます。
//! route table はこの trait 越しにしか wire format を知りません。

pub mod transport;

pub use self::transport::Transport;
