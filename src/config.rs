// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{DepartmentRepository, EmployeeRepository, RoleRepository, UserRepository},
    services::{auth::AuthService, employee_service::EmployeeService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    // None = qualquer origem
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("Invalid PORT: {raw}"))?,
            Err(_) => Self::DEFAULT_PORT,
        };

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid DB_MAX_CONNECTIONS: {raw}"))?,
            Err(_) => Self::DEFAULT_MAX_CONNECTIONS,
        };

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            db_max_connections,
            cors_allowed_origin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub employee_service: EmployeeService,
    pub department_repo: DepartmentRepository,
    pub role_repo: RoleRepository,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Pool limitado: quando esgota, as requisições esperam na fila até o timeout
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Failed to connect to the database")?;

        tracing::info!("✅ Database connection established");

        Ok(Self::from_pool(db_pool, config.jwt_secret.clone()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());

        Self {
            auth_service: AuthService::new(user_repo, jwt_secret),
            employee_service: EmployeeService::new(employee_repo, db_pool.clone()),
            department_repo: DepartmentRepository::new(db_pool.clone()),
            role_repo: RoleRepository::new(db_pool.clone()),
            db_pool,
        }
    }
}
