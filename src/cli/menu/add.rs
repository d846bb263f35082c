use canteen_app::{
    context::AppContext,
    domain::menu::{MenuService, models::NewMenuItem},
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct AddMenuItemArgs {
    /// Dish name
    #[arg(long)]
    name: String,

    /// Unit price in the smallest currency unit
    #[arg(long)]
    price: u64,

    /// Category label
    #[arg(long)]
    category: String,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(args: AddMenuItemArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let item = ctx
        .menu
        .create_item(NewMenuItem {
            name: args.name,
            price: args.price,
            category: args.category,
        })
        .await
        .map_err(|error| format!("failed to create menu item: {error}"))?;

    println!("item_id: {}", item.id);
    println!("name: {}", item.name);
    println!("price: {}", item.price);
    println!("category: {}", item.category);

    Ok(())
}
