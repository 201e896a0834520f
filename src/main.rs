mod config;
mod db;
mod dtos;
mod error;
mod handlers;
mod logging;
mod middleware;
mod models;
mod routes;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::http::{
    header::{InvalidHeaderValue, ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::{Config, ConfigError};
use db::{DBClient, UserExt};
use dotenvy::dotenv;
use logging::LoggingError;
use routes::create_router;
use thiserror::Error;
use tokio::signal;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db_client: Arc<dyn UserExt>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("failed to connect to the database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("invalid CORS origin: {0}")]
    CorsOrigin(#[from] InvalidHeaderValue),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // -- 加载环境变量
    dotenv().ok();

    if let Err(err) = run().await {
        eprintln!("🔥 {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // -- 加载配置
    let config = Config::from_env()?;

    // -- 初始化日志
    let _log_guard = logging::init(&config.log_dir)?;

    // -- 创建数据库连接池并执行迁移
    let pool = match db::create_pool(&config).await {
        Ok(pool) => {
            tracing::info!("✅ 数据库连接成功");
            pool
        }
        Err(err) => {
            tracing::error!(error = %err, "🔥 数据库连接失败");
            return Err(err.into());
        }
    };
    db::run_migrations(&pool).await?;

    let cors = cors_layer(&config.cors_origin)?;

    let app_state = AppState {
        db_client: Arc::new(DBClient::new(pool)),
    };

    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.server_port)).await?;

    tracing::info!("服务已启动，端口 {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("服务已停止");
    Ok(())
}

// -- 跨域配置，允许的来源来自 CORS_ORIGIN
fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]))
}

// -- 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "无法注册 Ctrl+C 信号处理");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "无法注册 SIGTERM 信号处理");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("收到 Ctrl+C，正在优雅关闭"),
        _ = terminate => tracing::warn!("收到终止信号，正在优雅关闭"),
    }
}
