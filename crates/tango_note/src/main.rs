mod api;
mod config;
mod database;
mod openai;
mod session;
mod translator;
mod utils;
mod word_store;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Extension;
use tracing::info;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    utils::init_logger(&config.log_level);

    let connection = Arc::new(database::setup_database().await.context("初始化数据库失败")?);
    info!("数据库就绪");

    let engine = Arc::new(api::template::build_engine().context("初始化模板引擎失败")?);
    let chat_client = Arc::new(openai::OpenAiClient::new(
        &config.openai_api_key,
        &config.openai_model,
        &config.openai_base_url,
    )?);
    let session_store = Arc::new(session::SessionStore::new());
    let config = Arc::new(config);

    let app = api::router()
        .layer(Extension(connection))
        .layer(Extension(engine))
        .layer(Extension(chat_client))
        .layer(Extension(session_store))
        .layer(Extension(config.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("监听 {} 失败", config.bind_address))?;
    info!("服务已启动: http://{}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
