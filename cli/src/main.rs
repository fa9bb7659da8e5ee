mod check;
mod completion;
mod conf;
mod display;
mod error;
mod prelude;
mod update;

use crate::prelude::*;

#[derive(Parser)]
#[command(version, about = "Price Sync CLI")]
struct Cli {
    #[arg(
        long = "json",
        global = true,
        help = "Print machine readable JSON instead of status lines"
    )]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Fetch current prices and write them into the Notion database")]
    Update(update::UpdateCommand),
    #[command(about = "Smoke test the price API and print detailed quotes")]
    Check(check::CheckCommand),
    #[command(about = "Show or update the Price Sync CLI configuration")]
    Conf(conf::ConfCommand),
    #[command(about = "Generate shell completions")]
    Completion(completion::CompletionCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    // Customize parsing error handling.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // These 2 are "not real errors" that are used to stop the execution
            // to display the CLI help or version.
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    println!("{}", e);

                    std::process::exit(0);
                }
                _ => (),
            }

            eprintln!(
                "{ballot} {error}",
                ballot = "✘".red().bold(),
                error = PriceSyncCliError::SyntaxError(e)
            );

            std::process::exit(1);
        }
    };

    JSON_MODE.store(cli.json, Ordering::Relaxed);

    // Send each sub-command to the respective handler.
    let result = match cli.command {
        Command::Update(update) => update::handle(update).await,
        Command::Check(check) => check::handle(check).await,
        Command::Conf(conf) => conf::handle(conf).await,
        Command::Completion(completion) => completion::handle(completion),
    };

    // Handle any errors that occurred during command execution.
    if let Err(e) = result {
        eprintln!("{ballot} {e}", ballot = "✘".red().bold());

        std::process::exit(1);
    }
}
