use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::DbError,
    dtos::{CreateUserDto, Response, UpdateUserDto, UserIdQuery},
    error::{ErrorMessage, HttpError},
    AppState,
};

pub fn user_handler() -> Router {
    Router::new()
        .route("/", get(all_users))
        .route("/user_id", get(user_by_id))
        .route("/create", post(create_user))
        .route("/update", put(update_user))
        .route("/delete", delete(delete_user))
}

// -- 数据库错误统一按 500 返回，详细信息只写入日志
fn storage_error(err: DbError) -> HttpError {
    tracing::error!(error = %err, "用户数据读写失败");
    HttpError::server_error(ErrorMessage::ServerError.to_string())
}

/// 返回全部用户，不分页
pub async fn all_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .db_client
        .get_users()
        .await
        .map_err(storage_error)?;

    Ok(Json(users))
}

/// 按 id 查询用户
///
/// # 返回
/// - `Ok(User)` -- 找到的用户
/// - `Err(HttpError)` -- `NotFound` 用户不存在
pub async fn user_by_id(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(query.user_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    Ok(Json(user))
}

/// 创建用户
///
/// username 的唯一性由数据库约束保证，不做预先查询
///
/// # 返回
/// - `Ok(StatusCode::OK)` -- 创建成功，不返回响应体
/// - `Err(HttpError)` -- 创建失败
///   - `BadRequest` -- 请求参数验证失败或 username 已存在
///   - `ServerError` -- 数据库错误
pub async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    // -- 验证请求参数
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .save_user(&body.username, &body.firstname, &body.lastname, body.age)
        .await;

    match result {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "用户创建成功");
            Ok(StatusCode::OK)
        }
        Err(DbError::UniqueViolation) => Err(HttpError::unique_constraint_violation(
            ErrorMessage::UserExist.to_string(),
        )),
        Err(e) => Err(storage_error(e)),
    }
}

/// 更新用户的 firstname、lastname 和 age
pub async fn update_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
    Json(body): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .update_user(query.user_id, &body.firstname, &body.lastname, body.age)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    Ok(Json(Response::ok("User update is successful!")))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_user(query.user_id)
        .await
        .map_err(storage_error)?;

    if !deleted {
        return Err(HttpError::not_found(ErrorMessage::UserNotFound.to_string()));
    }

    tracing::info!(user_id = query.user_id, "用户删除成功");
    Ok(Json(Response::ok("User was deleted!")))
}
