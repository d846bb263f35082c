use canteen_app::{context::AppContext, domain::menu::MenuService};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ListMenuArgs {
    /// Only show items students can currently order
    #[arg(long)]
    available: bool,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(args: ListMenuArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let items = if args.available {
        ctx.menu.list_available_items().await
    } else {
        ctx.menu.list_items().await
    }
    .map_err(|error| format!("failed to list menu: {error}"))?;

    for item in items {
        let marker = if item.is_available { "" } else { " (off)" };
        println!(
            "{}\t{}\t{}\t{}{marker}",
            item.id, item.category, item.name, item.price
        );
    }

    Ok(())
}
