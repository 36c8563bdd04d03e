//! `modforge completions <SHELL>`: print a completion script on stdout.

use clap::CommandFactory;

use crate::{cli::{Cli, CompletionsArgs}, error::CliResult};

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
