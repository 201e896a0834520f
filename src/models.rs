use serde::{Deserialize, Serialize};

// -- 用户实体，对应 users 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub age: i32,
}
