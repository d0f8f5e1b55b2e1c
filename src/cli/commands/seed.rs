use anyhow::anyhow;
use clap::Args;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::{connect_database, output_success};
use crate::cli::OutputFormat;
use crate::database::fixtures::DEFAULT_PASSWORD;
use crate::database::{Fixtures, PgStore};

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(long, help = "Apply migrations before seeding")]
    pub migrate: bool,

    #[arg(long, help = "Password given to every fixture account")]
    pub password: Option<String>,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, database) = connect_database().await?;
    if args.migrate {
        database.migrate().await?;
    }

    let password = args.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
    let hash = hash_password(password).map_err(|e| anyhow!("failed to hash password: {}", e))?;
    let fixtures = Fixtures::generate(&hash);

    PgStore::new(database.pool().clone()).seed(&fixtures).await?;
    database.close().await;

    tracing::info!("Seeded fixture data set");
    output_success(
        output_format,
        "Database seeded with fixtures",
        Some(json!({
            "admins": fixtures.admins.len(),
            "clients": fixtures.clients.len(),
            "products": fixtures.products.len(),
            "users": fixtures.users.len(),
        })),
    )
}
