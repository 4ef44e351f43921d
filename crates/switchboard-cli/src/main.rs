use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, sleep};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use switchboard_core::{
    EventContext, EventKey, Handler, HandlerError, PayloadType, RawPayload, Router, RouterBuilder,
    RouterConfig,
};

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: String,
    name: String,
}

#[derive(Debug)]
struct Playlist {
    title: String,
    tracks: Vec<String>,
}

/// catalog サービスが扱うイベントの語彙
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogEvent {
    UserCreated,
    PlaylistCreated,
    UserDeleted,
}

impl EventKey for CatalogEvent {
    fn data_type(&self) -> PayloadType {
        match self {
            CatalogEvent::UserCreated | CatalogEvent::UserDeleted => PayloadType::of::<User>(),
            CatalogEvent::PlaylistCreated => PayloadType::of::<Playlist>(),
        }
    }
}

/// handler が共有する依存（本番なら DB pool や mailer client）
#[derive(Default)]
struct AppDeps {
    welcomes_sent: AtomicU32,
}

struct WelcomeMailer;

#[async_trait]
impl Handler<AppDeps, User> for WelcomeMailer {
    async fn handle(&self, ctx: EventContext, deps: Arc<AppDeps>, user: User) -> Result<(), HandlerError> {
        // メール送信のつもり
        sleep(Duration::from_millis(20)).await;
        let total = deps.welcomes_sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(dispatch_id = %ctx.dispatch_id(), user = %user.id, total, "welcome mail sent to {}", user.name);
        Ok(())
    }
}

fn config_from_env() -> anyhow::Result<RouterConfig> {
    let mut config = RouterConfig::default();
    if let Ok(name) = std::env::var("SWITCHBOARD_ROUTER_NAME") {
        config.name = name;
    }
    if let Ok(limit) = std::env::var("SWITCHBOARD_MAX_PAYLOAD_BYTES") {
        let limit = limit
            .parse::<usize>()
            .with_context(|| format!("SWITCHBOARD_MAX_PAYLOAD_BYTES is not a byte count: {limit}"))?;
        config.max_json_payload_bytes = Some(limit);
    }
    Ok(config)
}

fn build_router(config: RouterConfig) -> anyhow::Result<Router<AppDeps>> {
    let router = RouterBuilder::with_config(AppDeps::default(), config)
        // (A) JSON bytes で届くイベント
        .json_event(CatalogEvent::UserCreated, WelcomeMailer)?
        // (B) プロセス内で型付きのまま届くイベント
        .untransported_event(
            CatalogEvent::PlaylistCreated,
            |_ctx: EventContext, _deps: Arc<AppDeps>, playlist: Playlist| async move {
                info!(tracks = playlist.tracks.len(), "playlist created: {}", playlist.title);
                Ok::<(), HandlerError>(())
            },
        )?
        .expect_event(CatalogEvent::UserCreated)
        .expect_event(CatalogEvent::PlaylistCreated)
        .build()?;
    Ok(router)
}

/// 別サービスが送ってくる、User と形の合わない JSON
fn foreign_user_payload() -> anyhow::Result<RawPayload> {
    let body = serde_json::to_vec(&serde_json::json!({ "user_id": 42, "display_name": "Matthew" }))?;
    Ok(RawPayload::bytes(body))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("switchboard=debug".parse()?))
        .init();

    let router = build_router(config_from_env()?)?;
    info!(router = %router.config().name, routes = ?router.routes().registered_keys(), "router ready");

    // (C) 正常系: JSON と in-memory の両方
    let user = User {
        id: "usr_001".into(),
        name: "Matthew".into(),
    };
    router
        .dispatch(&CatalogEvent::UserCreated, RawPayload::json(&user)?)
        .await?;
    router
        .dispatch_value(
            &CatalogEvent::PlaylistCreated,
            Playlist {
                title: "Road trip".into(),
                tracks: vec!["Intro".into(), "Highway".into()],
            },
        )
        .await?;

    // (D) 失敗系: 壊れた JSON、形の違う JSON、未登録キー。handler は呼ばれない
    let failures = [
        (CatalogEvent::UserCreated, RawPayload::bytes("{\"id\": 42")),
        (CatalogEvent::UserCreated, foreign_user_payload()?),
        (CatalogEvent::UserDeleted, RawPayload::json(&user)?),
    ];
    for (key, raw) in failures {
        if let Err(err) = router.dispatch(&key, raw).await {
            warn!(key = ?key, kind = ?err.kind(), "dispatch rejected: {err}");
        }
    }

    info!(
        welcomes_sent = router.deps().welcomes_sent.load(Ordering::Relaxed),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::{DispatchError, ErrorKind, TransportError};

    #[tokio::test]
    async fn demo_router_rejects_foreign_json_without_calling_handler() {
        let router = build_router(RouterConfig::named("test")).unwrap();

        let err = router
            .dispatch(&CatalogEvent::UserCreated, foreign_user_payload().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport(TransportError::Json(_))));
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(router.deps().welcomes_sent.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn demo_router_delivers_well_formed_user() {
        let router = build_router(RouterConfig::default()).unwrap();
        let body = serde_json::json!({ "id": "usr_001", "name": "Matthew" });

        router
            .dispatch(&CatalogEvent::UserCreated, RawPayload::json(&body).unwrap())
            .await
            .unwrap();
        assert_eq!(router.deps().welcomes_sent.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn demo_router_leaves_user_deleted_unbound() {
        let router = build_router(RouterConfig::default()).unwrap();
        let err = router
            .dispatch(&CatalogEvent::UserDeleted, RawPayload::bytes("{}"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Routing);
    }
}
