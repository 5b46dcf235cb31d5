//! Demo-data seeder: one account, a profile, and a couple of posts so a
//! fresh database renders a living home feed.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::ArgonPasswordHasher;
use configs::AppConfig;
use domains::{
    AccountStore, CommentStore, LikeStore, NewAccount, NewComment, NewPost, PostStore, Profile,
    ProfileStore,
};
use storage_adapters::PostgresGateway;
use tracing_subscriber::EnvFilter;

const SEED_EMAIL: &str = "demo@hobbylog.local";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let gateway = Arc::new(
        PostgresGateway::connect(&config.database.url, config.database.max_connections)
            .await
            .context("connecting to postgres")?,
    );

    if AccountStore::find_by_email(gateway.as_ref(), SEED_EMAIL.to_string())
        .await?
        .is_some()
    {
        tracing::info!("seed account already present; nothing to do");
        return Ok(());
    }

    let credential = AccountStore::insert(
        gateway.as_ref(),
        NewAccount {
            email: SEED_EMAIL.to_string(),
            password_hash: ArgonPasswordHasher.hash("demo-password")?,
        },
    )
    .await?;
    let demo = credential.account.id;
    ProfileStore::insert(
        gateway.as_ref(),
        Profile {
            id: demo,
            username: "다꾸장인".to_string(),
        },
    )
    .await?;

    let first = PostStore::insert(
        gateway.as_ref(),
        NewPost {
            user_id: demo,
            title: "오늘의 다꾸".to_string(),
            content: "새로 산 스티커로 일주일 스프레드를 꾸몄어요.\n내일은 독서 기록!".to_string(),
        },
    )
    .await?;
    PostStore::insert(
        gateway.as_ref(),
        NewPost {
            user_id: demo,
            title: "8월 독서 기록".to_string(),
            content: "이번 달은 세 권 읽는 게 목표예요.".to_string(),
        },
    )
    .await?;

    CommentStore::insert(
        gateway.as_ref(),
        NewComment {
            post_id: first.id,
            user_id: demo,
            content: "다음 주에는 마스킹테이프도 써볼게요.".to_string(),
        },
    )
    .await?;
    LikeStore::insert(gateway.as_ref(), first.id, demo).await?;

    tracing::info!(account = %demo, "seeded demo data");
    Ok(())
}
