use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::user::{all_users, user_handler},
    middleware::logging_middleware,
    AppState,
};

// -- 配置所有路由
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .nest("/user", user_handler())
        // -- nest 之后的根路由只匹配 /user，这里补上 /user/
        .route("/user/", get(all_users))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(logging_middleware))
        .layer(Extension(app_state))
}

// -- 健康检查接口
async fn health_check() -> &'static str {
    "Hello, Axum!"
}
