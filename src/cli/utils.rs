use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::schema::ValidationErrors;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output validation failures, one line per message in text mode
pub fn output_field_errors(output_format: &OutputFormat, errors: &ValidationErrors) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": "Invalid input",
                "field_errors": errors
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for (field, messages) in errors.clone().into_inner() {
                for message in messages {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
    }
    Ok(())
}
