//! Apply database migrations.

use anyhow::Result;

use super::setup::{self, GlobalArgs};

/// Runs the migrate command.
///
/// # Errors
/// Returns an error if the connection or a migration fails.
pub async fn run_migrate(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let db = setup::connect(&config).await?;

    let result = db.run_migrations().await;
    db.close().await;

    result?;
    tracing::info!("Migrations applied");
    Ok(())
}
