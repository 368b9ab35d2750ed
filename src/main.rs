use clap::Parser;
use admin_form_assist::cli::commands::{cmd_bookings, cmd_rules, cmd_stock, cmd_visibility};
use admin_form_assist::cli::config::{Cli, Commands, apply_cli_overrides, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Resolve settings: CLI > config > defaults
    let config = apply_cli_overrides(load_config(cli.config.as_deref()), &cli);

    match &cli.command {
        Commands::Visibility {
            value,
            layout,
            format,
        } => {
            cmd_visibility(
                &config,
                value.as_deref(),
                layout.as_deref(),
                format,
                cli.verbose,
            )?;
        }
        Commands::Stock { item, format } => {
            cmd_stock(&config, item, format, cli.verbose)?;
        }
        Commands::Bookings {
            item,
            start,
            end,
            format,
        } => {
            cmd_bookings(&config, item, start, end, format, cli.verbose)?;
        }
        Commands::Rules => {
            cmd_rules(&config)?;
        }
    }

    Ok(())
}
