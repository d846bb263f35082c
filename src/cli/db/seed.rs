use canteen_app::{context::AppContext, seed};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    seed::install(&ctx)
        .await
        .map_err(|error| format!("failed to install sample data: {error}"))?;

    println!("sample data installed");

    Ok(())
}
