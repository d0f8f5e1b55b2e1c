use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Output a success message in the appropriate format. In JSON mode the
/// fields of `data` are merged next to `success` and `message`.
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_document(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(Value::Object(fields)) = data {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => println!("  {}: {}", key, s),
                        other => println!("  {}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}

fn success_document(message: &str, data: Option<Value>) -> Value {
    let mut document = Map::new();
    document.insert("success".to_string(), json!(true));
    document.insert("message".to_string(), json!(message));

    match data {
        Some(Value::Object(fields)) => document.extend(fields),
        Some(other) => {
            document.insert("data".to_string(), other);
        }
        None => {}
    }
    Value::Object(document)
}

/// Loads configuration from the environment and connects to PostgreSQL.
pub async fn connect_database() -> anyhow::Result<(AppConfig, DatabaseManager)> {
    let config = AppConfig::from_env();
    let database = DatabaseManager::connect(&config.database).await?;
    database.health_check().await?;
    Ok((config, database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_document_merges_object_fields() {
        let doc = success_document("Seeded", Some(json!({ "products": 20 })));
        assert_eq!(doc, json!({ "success": true, "message": "Seeded", "products": 20 }));

        let doc = success_document("Hashed", Some(json!("abc")));
        assert_eq!(doc, json!({ "success": true, "message": "Hashed", "data": "abc" }));

        let doc = success_document("Done", None);
        assert_eq!(doc, json!({ "success": true, "message": "Done" }));
    }
}
