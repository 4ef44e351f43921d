//! EventContext - dispatch ごとの実行コンテキスト
//!
//! handler にそのまま渡される値です。core はキャンセルもタイムアウトもしません。
//! `cancellation` を見て止まるかどうかは handler の責任です。

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use ulid::Ulid;

/// EventContext は dispatch ごとのコンテキスト
///
/// clone は安価で、clone 同士はキャンセルトークンを共有する。
#[derive(Debug, Clone)]
pub struct EventContext {
    dispatch_id: Ulid,
    issued_at: DateTime<Utc>,
    cancellation: CancellationToken,
}

impl EventContext {
    pub fn new() -> Self {
        Self::with_cancellation(CancellationToken::new())
    }

    /// 呼び出し側のトークンを使う（リクエストや shutdown に紐づくもの）
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            dispatch_id: Ulid::new(),
            issued_at: Utc::now(),
            cancellation,
        }
    }

    /// ネストした dispatch 用のコンテキスト（新しい id と子トークン）
    ///
    /// 親をキャンセルすると子もキャンセルされる。逆は伝わらない。
    pub fn child(&self) -> Self {
        Self::with_cancellation(self.cancellation.child_token())
    }

    pub fn dispatch_id(&self) -> Ulid {
        self.dispatch_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// キャンセルされるまで待つ
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new()
    }
}
