//! RouterConfig - router の設定
//!
//! ファイルや環境変数から読めるよう serde で Deserialize できます。
//! 欠けた項目はデフォルトで埋めます。

use serde::{Deserialize, Serialize};

use crate::impls::JsonTransport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// dispatch span とログに載る router 名
    pub name: String,

    /// `define_json_event` が使う JsonTransport の上限（`None` は無制限）
    pub max_json_payload_bytes: Option<usize>,
}

impl RouterConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_max_json_payload_bytes(mut self, limit: usize) -> Self {
        self.max_json_payload_bytes = Some(limit);
        self
    }

    /// この設定に対応する JsonTransport
    pub fn json_transport(&self) -> JsonTransport {
        match self.max_json_payload_bytes {
            Some(limit) => JsonTransport::with_limit(limit),
            None => JsonTransport::new(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            max_json_payload_bytes: None,
        }
    }
}
