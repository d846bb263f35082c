use clap::{Args, Subcommand};

mod add;
mod list;

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
enum MenuSubcommand {
    Add(add::AddMenuItemArgs),
    List(list::ListMenuArgs),
}

pub(crate) async fn run(command: MenuCommand) -> Result<(), String> {
    match command.command {
        MenuSubcommand::Add(args) => add::run(args).await,
        MenuSubcommand::List(args) => list::run(args).await,
    }
}
