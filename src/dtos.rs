use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "Firstname must not be empty"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Lastname must not be empty"))]
    pub lastname: String,
    pub age: i32,
}

// -- username 与 id 创建后不可修改
#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "Firstname must not be empty"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Lastname must not be empty"))]
    pub lastname: String,
    pub age: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i32,
}

// -- 写操作成功后的状态响应
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    pub transaction: String,
}

impl Response {
    pub fn ok(transaction: impl Into<String>) -> Self {
        Response {
            status_code: 200,
            transaction: transaction.into(),
        }
    }
}
