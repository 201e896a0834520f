use axum::{
    extract::Request,
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

// -- 请求日志中间件
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    // -- 提取请求信息
    let method: Method = request.method().clone();
    let uri: Uri = request.uri().clone();
    let start: Instant = Instant::now();

    // -- 处理请求
    let response: Response = next.run(request).await;

    // -- 获取响应状态码
    let status: StatusCode = response.status();
    let duration = start.elapsed();

    // -- 按状态码分级记录
    match status.as_u16() {
        100..=399 => {
            tracing::info!(
                target: "request",
                method = %method,
                path = %uri,
                status = %status.as_u16(),
                duration = ?duration,
                "请求成功"
            );
        }
        400..=499 => {
            tracing::warn!(
                target: "request",
                method = %method,
                path = %uri,
                status = %status.as_u16(),
                duration = ?duration,
                "客户端错误"
            );
        }
        _ => {
            tracing::error!(
                target: "request",
                method = %method,
                path = %uri,
                status = %status.as_u16(),
                duration = ?duration,
                "服务器错误"
            );
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn passes_response_through_unchanged() {
        let app = Router::new()
            .route(
                "/teapot",
                get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }),
            )
            .layer(from_fn(logging_middleware));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/teapot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"short and stout");
    }
}
