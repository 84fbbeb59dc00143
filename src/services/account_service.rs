use serde_json::Value;
use sqlx::SqlitePool;

use crate::auth::password::{hash_password, PasswordError};
use crate::config::SecurityConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::schema::{LoadMode, LoadSchema, LoginSchema, RegisterSchema, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    Invalid(ValidationErrors),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::Invalid(errors)
    }
}

/// User registration and credential checks, shared by the HTTP API and the CLI
pub struct AccountService<'a> {
    pool: &'a SqlitePool,
    security: &'a SecurityConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(pool: &'a SqlitePool, security: &'a SecurityConfig) -> Self {
        Self { pool, security }
    }

    /// Validate a registration payload and create the user
    pub async fn register(&self, body: Value) -> Result<User, AccountError> {
        let schema = RegisterSchema {
            password_min_length: self.security.password_min_length,
        };
        let input = schema.load(body, LoadMode::Create)?;

        let mut errors = ValidationErrors::new();
        if User::username_taken(self.pool, &input.username).await? {
            errors.add("username", format!("User with username {} already exists.", input.username));
        }
        if User::email_taken(self.pool, &input.email).await? {
            errors.add("email", format!("User with email {} already exists.", input.email));
        }
        errors.into_result()?;

        let password_hash = hash_password(input.password, self.security.bcrypt_cost).await?;
        let user = User::create(
            self.pool,
            &NewUser {
                username: input.username,
                email: input.email,
                password_hash,
            },
        )
        .await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Check a login payload; unknown users and wrong passwords fail alike
    pub async fn authenticate(&self, body: Value) -> Result<User, AccountError> {
        let input = LoginSchema.load(body, LoadMode::Create)?;

        let user = match User::find_by_username(self.pool, &input.username).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login attempt for unknown user {}", input.username);
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !user.verify_password(&input.password).await? {
            tracing::warn!("Failed login for user {}", user.username);
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::Database;
    use serde_json::json;

    async fn setup() -> (Database, AppConfig) {
        let config = AppConfig::testing();
        let db = Database::connect(&config.database).await.unwrap();
        db.create_all().await.unwrap();
        (db, config)
    }

    #[tokio::test]
    async fn registers_then_authenticates() {
        let (db, config) = setup().await;
        let service = AccountService::new(db.pool(), &config.security);

        let user = service
            .register(json!({"username": "wcyn", "email": "wcyn@andela.com", "password": "12345678"}))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "12345678");

        let found = service
            .authenticate(json!({"username": "wcyn", "password": "12345678"}))
            .await
            .unwrap();
        assert_eq!(found.id, user.id);

        let wrong = service
            .authenticate(json!({"username": "wcyn", "password": "nope-nope"}))
            .await;
        assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_field_errors() {
        let (db, config) = setup().await;
        let service = AccountService::new(db.pool(), &config.security);
        let body = json!({"username": "paul", "email": "paul@andela.com", "password": "12345678"});
        service.register(body.clone()).await.unwrap();

        match service.register(body).await {
            Err(AccountError::Invalid(errors)) => {
                assert_eq!(errors.get("username").unwrap(), ["User with username paul already exists."]);
                assert_eq!(errors.get("email").unwrap(), ["User with email paul@andela.com already exists."]);
            }
            other => panic!("expected field errors, got {:?}", other.map(|u| u.id)),
        }
    }
}
