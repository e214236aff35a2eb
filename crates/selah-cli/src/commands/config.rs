//! Config command handlers

use anyhow::Result;

use selah_core::Config;

use crate::output::Output;
use crate::ConfigCommands;

/// Handle the config subcommand
pub fn handle(command: Option<ConfigCommands>, config: &Config, output: &Output) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            output.print_config(config);
            Ok(())
        }
    }
}
