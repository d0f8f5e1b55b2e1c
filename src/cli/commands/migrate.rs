use crate::cli::utils::{connect_database, output_success};
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, database) = connect_database().await?;
    database.migrate().await?;
    database.close().await;
    output_success(output_format, "Database migrations applied", None)
}
