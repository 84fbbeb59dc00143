use serde_json::json;

use crate::cli::utils::{output_field_errors, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;
use crate::schema::{DumpSchema, Links, UserSchema};
use crate::services::{AccountError, AccountService};

pub async fn create(
    config: &AppConfig,
    username: String,
    email: String,
    password: String,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    db.create_all().await?;

    let body = json!({ "username": username, "email": email, "password": password });
    let result = AccountService::new(db.pool(), &config.security).register(body).await;
    db.close().await;

    match result {
        Ok(user) => {
            let links = Links::new(config.api.public_url.as_deref())?;
            let dumped = UserSchema { links: &links }.dump(&user);
            output_success(
                &output_format,
                &format!("Created user {} ({})", user.username, user.id),
                Some(json!({ "user": dumped })),
            )
        }
        Err(AccountError::Invalid(errors)) => {
            output_field_errors(&output_format, &errors)?;
            Err(anyhow::anyhow!("User {} was not created", username))
        }
        Err(e) => Err(e.into()),
    }
}
