use anyhow::anyhow;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub fn handle(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }
    let hash = hash_password(password).map_err(|e| anyhow!("failed to hash password: {}", e))?;
    output_success(output_format, "Password hashed", Some(json!({ "hash": hash })))
}
