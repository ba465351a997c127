use bpmotif::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{counts_loss_weight, modisco},
    utils::{handle_error_and_exit, Result},
};
use clap::Parser;

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Modisco(_) => "modisco",
        Command::CountsLossWeight(_) => "counts-loss-weight",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Modisco(args) => modisco::modisco(args)?,
        Command::CountsLossWeight(args) => counts_loss_weight::counts_loss_weight(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
