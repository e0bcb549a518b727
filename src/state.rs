use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::utils::notify::Notifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let email_config = EmailConfig::from_env();
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            notifier: Notifier::new(email_config.clone()),
            email_config,
            cors_config: CorsConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> AppState {
    AppState::new(init_db_pool().await)
}
