use {
    crate::{prelude::*, Cli},
    clap::CommandFactory,
};

#[derive(Args)]
pub(crate) struct CompletionCommand {
    #[arg(value_enum)]
    pub(crate) shell: clap_complete::Shell,
}

pub(crate) fn handle(command: CompletionCommand) -> AnyResult<(), PriceSyncCliError> {
    let mut cli_command = Cli::command();

    clap_complete::generate(
        command.shell,
        &mut cli_command,
        "price-sync",
        &mut std::io::stdout(),
    );

    Ok(())
}
