//! Benefits command - look up benefit names matching a fragment.

use kolejka::config::{self, DiscoverySettings, FetchSettings};

use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

/// Arguments for the benefits command.
#[derive(clap::Args)]
pub struct BenefitsArgs {
    /// Name fragment to match, minimum three characters
    pub fragment: String,
}

/// Run the benefits command.
pub async fn run(args: BenefitsArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("benefits");

    if args.fragment.chars().count() <= 2 {
        println!("Fragments shorter than three characters return no results.");
        return Ok(());
    }

    let orchestrator = runner.build_orchestrator(
        DiscoverySettings::default(),
        FetchSettings::default(),
        config::DEFAULT_CENTER,
    );

    let names = orchestrator.lookup_benefits(&args.fragment).await?;
    output::print_benefit_names(&args.fragment, &names);

    Ok(())
}
