use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::{config::Config, models::User};

const USER_COLUMNS: &str = "id, username, firstname, lastname, age";

// -- 数据访问层错误
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation
            }
            _ => DbError::Sqlx(err),
        }
    }
}

// -- 创建数据库连接池
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    // -- 配置连接池选项
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    // -- 运行简单查询来测试连接
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

// -- 执行 migrations 目录下的迁移脚本
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: PgPool,
}

impl DBClient {
    pub fn new(pool: PgPool) -> Self {
        DBClient { pool }
    }
}

/// 用户表的数据访问接口，每个方法只执行一条语句
#[async_trait]
pub trait UserExt: Send + Sync {
    async fn get_users(&self) -> Result<Vec<User>, DbError>;

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DbError>;

    /// username 重复时返回 `DbError::UniqueViolation`
    async fn save_user(
        &self,
        username: &str,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<User, DbError>;

    /// 用户不存在时返回 `Ok(None)`
    async fn update_user(
        &self,
        user_id: i32,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<Option<User>, DbError>;

    /// 返回是否删除了记录
    async fn delete_user(&self, user_id: i32) -> Result<bool, DbError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_users(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save_user(
        &self,
        username: &str,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, firstname, lastname, age) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(firstname)
        .bind(lastname)
        .bind(age)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: i32,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET firstname = $2, lastname = $3, age = $4 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(firstname)
        .bind(lastname)
        .bind(age)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    // -- 需要真实的 Postgres：DATABASE_URL=... cargo test -- --ignored
    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn postgres_round_trip(pool: PgPool) -> Result<(), DbError> {
        let db = DBClient::new(pool);

        assert!(db.get_users().await?.is_empty());

        let alice = db.save_user("alice", "A", "L", 30).await?;
        assert_eq!(db.get_user(alice.id).await?, Some(alice.clone()));

        let duplicate = db.save_user("alice", "B", "M", 40).await;
        assert!(matches!(duplicate, Err(DbError::UniqueViolation)));
        assert_eq!(db.get_users().await?.len(), 1);

        let updated = db.update_user(alice.id, "Alicia", "Lee", 31).await?;
        let updated = updated.expect("row exists");
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.age, 31);

        assert_eq!(db.update_user(alice.id + 100, "X", "Y", 1).await?, None);

        assert!(db.delete_user(alice.id).await?);
        assert!(!db.delete_user(alice.id).await?);
        assert_eq!(db.get_user(alice.id).await?, None);

        Ok(())
    }
}
