//! RouterBuilder - router の構築と起動時検証
//!
//! # Fail-fast 設計
//! - `expect_event()` で「必ず登録されているべきキー」を宣言
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す（本番で NoSuchEvent を踏む前に気付ける）

use serde::de::DeserializeOwned;

use crate::domain::{ErasedKey, EventKey, RouteError};
use crate::ports::Transport;
use crate::typed::{Dependencies, Handler};

use super::config::RouterConfig;
use super::router::Router;

/// RouterBuilder は Router を組み立てる
///
/// # 使用例
/// ```ignore
/// let router = RouterBuilder::new(deps)
///     .json_event(CatalogEvent::UserCreated, WelcomeMailer)?
///     .expect_event(CatalogEvent::UserCreated)
///     .expect_event(CatalogEvent::PlaylistCreated)
///     .build()?;
/// ```
pub struct RouterBuilder<D: Dependencies> {
    router: Router<D>,
    expected: Vec<ErasedKey>,
}

/// BuildError は router 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing routes: {0:?}. These events were expected but not registered.")]
    MissingRoutes(Vec<String>),
}

impl<D: Dependencies> RouterBuilder<D> {
    pub fn new(deps: D) -> Self {
        Self::with_config(deps, RouterConfig::default())
    }

    pub fn with_config(deps: D, config: RouterConfig) -> Self {
        Self {
            router: Router::with_config(deps, config),
            expected: Vec::new(),
        }
    }

    pub fn event<K, T, Tr, H>(self, key: K, transport: Tr, handler: H) -> Result<Self, RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        Tr: Transport<T>,
        H: Handler<D, T>,
    {
        self.router.define_event::<K, T, Tr, H>(key, transport, handler)?;
        Ok(self)
    }

    pub fn json_event<K, T, H>(self, key: K, handler: H) -> Result<Self, RouteError>
    where
        K: EventKey,
        T: DeserializeOwned + Send + 'static,
        H: Handler<D, T>,
    {
        self.router.define_json_event::<K, T, H>(key, handler)?;
        Ok(self)
    }

    pub fn untransported_event<K, T, H>(self, key: K, handler: H) -> Result<Self, RouteError>
    where
        K: EventKey,
        T: Send + 'static,
        H: Handler<D, T>,
    {
        self.router.define_untransported_event::<K, T, H>(key, handler)?;
        Ok(self)
    }

    /// `build()` までに登録されているべきキーを宣言
    pub fn expect_event<K: EventKey>(mut self, key: K) -> Self {
        self.expected.push(ErasedKey::new(key));
        self
    }

    pub fn build(self) -> Result<Router<D>, BuildError> {
        let missing: Vec<String> = self
            .expected
            .iter()
            .filter(|key| !self.router.routes().contains_erased(key))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingRoutes(missing));
        }
        Ok(self.router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventContext, HandlerError, RawPayload};
    use crate::impls::JsonTransport;
    use crate::testing::{CatalogEvent, Event, Playlist, User};
    use std::sync::Arc;

    async fn noop_user(_ctx: EventContext, _deps: Arc<()>, _user: User) -> Result<(), HandlerError> {
        Ok(())
    }

    async fn noop_playlist(_ctx: EventContext, _deps: Arc<()>, _playlist: Playlist) -> Result<(), HandlerError> {
        Ok(())
    }

    #[tokio::test]
    async fn build_success() {
        let router = RouterBuilder::new(())
            .json_event(CatalogEvent::UserCreated, noop_user)
            .unwrap()
            .event(CatalogEvent::PlaylistCreated, JsonTransport::new(), noop_playlist)
            .unwrap()
            .expect_event(CatalogEvent::UserCreated)
            .expect_event(CatalogEvent::PlaylistCreated)
            .build()
            .unwrap();

        assert_eq!(router.routes().len(), 2);
        router
            .dispatch(&CatalogEvent::UserCreated, RawPayload::bytes(r#"{"id":"a","name":"b"}"#))
            .await
            .unwrap();
    }

    #[test]
    fn build_missing_routes() {
        let result = RouterBuilder::new(())
            .json_event(CatalogEvent::UserCreated, noop_user)
            .unwrap()
            .expect_event(CatalogEvent::UserCreated)
            .expect_event(CatalogEvent::PlaylistCreated)
            .expect_event(Event("audit"))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::MissingRoutes(missing))
                if missing == vec!["PlaylistCreated".to_string(), "Event(\"audit\")".to_string()]
        ));
    }

    #[test]
    fn build_without_expectations() {
        let result = RouterBuilder::new(())
            .untransported_event(CatalogEvent::UserCreated, noop_user)
            .unwrap()
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn duplicate_registration_stops_the_chain() {
        let result = RouterBuilder::new(())
            .json_event(CatalogEvent::UserCreated, noop_user)
            .unwrap()
            .json_event(CatalogEvent::UserCreated, noop_user);
        assert!(matches!(result, Err(RouteError::DuplicateRouteDef { .. })));
    }
}
