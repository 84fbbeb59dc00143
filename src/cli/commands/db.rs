use std::io::{self, BufRead, Write};

use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;

pub async fn init(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    db.create_all().await?;
    db.close().await;

    output_success(
        &output_format,
        "Database tables created",
        Some(json!({ "database": config.database.url })),
    )
}

pub async fn drop(config: &AppConfig, yes: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let question = format!("Drop every table in {}?", config.database.url);
    if !yes && !confirm(&question, io::stdin().lock(), io::stderr())? {
        return output_success(&output_format, "Aborted, nothing was dropped", None);
    }

    let db = Database::connect(&config.database).await?;
    db.drop_all().await?;
    db.close().await;

    output_success(
        &output_format,
        "Database tables dropped",
        Some(json!({ "database": config.database.url })),
    )
}

/// Ask `question` on `prompt` and read a y/N answer from `input`
fn confirm(question: &str, mut input: impl BufRead, mut prompt: impl Write) -> anyhow::Result<bool> {
    write!(prompt, "{} [y/N] ", question)?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
