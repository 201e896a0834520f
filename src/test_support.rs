use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    db::{DbError, UserExt},
    models::User,
    AppState,
};

// -- 内存中的用户表，行为与 users 表的唯一约束一致
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    next_id: i32,
    rows: Vec<User>,
}

impl MemoryUserStore {
    pub fn rows(&self) -> Vec<User> {
        self.inner.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl UserExt for MemoryUserStore {
    async fn get_users(&self) -> Result<Vec<User>, DbError> {
        Ok(self.rows())
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == user_id).cloned())
    }

    async fn save_user(
        &self,
        username: &str,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<User, DbError> {
        let mut table = self.inner.lock().unwrap();
        if table.rows.iter().any(|u| u.username == username) {
            return Err(DbError::UniqueViolation);
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: username.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            age,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: i32,
        firstname: &str,
        lastname: &str,
        age: i32,
    ) -> Result<Option<User>, DbError> {
        let mut table = self.inner.lock().unwrap();
        let Some(user) = table.rows.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        user.firstname = firstname.to_string();
        user.lastname = lastname.to_string();
        user.age = age;
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, DbError> {
        let mut table = self.inner.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|u| u.id != user_id);
        Ok(table.rows.len() < before)
    }
}

pub fn test_state(store: Arc<MemoryUserStore>) -> Arc<AppState> {
    Arc::new(AppState {
        db_client: store,
    })
}
