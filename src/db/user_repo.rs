// src/db/user_repo.rs

use sqlx::PgPool;

use crate::common::{
    db_utils::{violation, Violation},
    error::AppError,
};
use crate::models::auth::User;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::database("during login"))
    }

    // Cria um novo usuário; e-mail duplicado vira Conflict
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => AppError::Conflict("Email already exists".into()),
            _ => AppError::database("during registration")(e),
        })
    }
}
