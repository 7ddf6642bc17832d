//! Regions command - print the voivodeship code table.

use crate::error::CliError;
use crate::output;

/// Run the regions command. Purely local, no logging or network setup.
pub fn run() -> Result<(), CliError> {
    output::print_region_codes();
    Ok(())
}
