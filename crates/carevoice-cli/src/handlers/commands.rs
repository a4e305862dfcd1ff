//! Commands command handler.
//!
//! Lists the voice commands `listen` understands.

use crate::error::CliError;
use crate::navigation::{DEFAULT_COMMANDS, NavigationCommand};
use crate::presentation::{print_separator, truncate_string};

/// Execute the commands command.
pub fn execute(json: bool) -> Result<(), CliError> {
    if json {
        let rendered = serde_json::to_string_pretty(DEFAULT_COMMANDS)
            .map_err(|e| CliError::Io(format!("failed to encode commands: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} voice command(s):\n", DEFAULT_COMMANDS.len());
    println!("{:<16} {:<32} Also understood", "Say", "To");
    print_separator(90);
    for command in DEFAULT_COMMANDS {
        println!("{}", format_row(command));
    }
    Ok(())
}

fn format_row(command: &NavigationCommand) -> String {
    format!(
        "{:<16} {:<32} {}",
        command.phrase,
        truncate_string(command.description, 31),
        command.aliases.join(", ")
    )
}
