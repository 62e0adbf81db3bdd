//! `guidebook` command-line entry point

use clap::{value_parser, Arg, ArgAction, Command};
use guidebook_cli::{commands, Output};
use guidebook_core::GuidebookConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("guidebook")
        .version(guidebook_core::VERSION)
        .about("Mikana Branch Guidebook access and checklist tooling")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a guidebook TOML config"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .subcommand(Command::new("roles").about("List roles, labels and capabilities"))
        .subcommand(Command::new("today").about("Print today's day key"))
        .subcommand(
            Command::new("key")
                .about("Derive a checklist storage key")
                .arg(Arg::new("branch").long("branch").required(true).help("Branch slug"))
                .arg(Arg::new("role").long("role").required(true).help("Role identifier"))
                .arg(Arg::new("date").long("date").help("Day as YYYY-MM-DD (default: today)"))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Reject empty identifiers and non-canonical dates"),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Format a date or time for display")
                .arg(Arg::new("input").long("input").required(true).help("Date, date-time or RFC 3339 instant"))
                .arg(Arg::new("pattern").long("pattern").help("strftime pattern"))
                .arg(
                    Arg::new("time")
                        .long("time")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("pattern")
                        .help("Format the time of day instead"),
                ),
        )
        .subcommand(
            Command::new("access")
                .about("Evaluate an access decision")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .required(true)
                        .help("Real role, or 'none' when signed out"),
                )
                .arg(Arg::new("capability").long("capability").required(true).help("Required capability"))
                .arg(Arg::new("preview-as").long("preview-as").help("Role being previewed")),
        )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GuidebookConfig::load(path)?,
        None => GuidebookConfig::default(),
    };
    let output = if matches.get_flag("json") {
        Output::Json
    } else {
        Output::Text
    };
    let dates = config.date_service()?;

    if let Some((name, _)) = matches.subcommand() {
        tracing::debug!(command = name, "dispatching");
    }

    let rendered = match matches.subcommand() {
        Some(("roles", _)) => commands::roles(output)?,
        Some(("today", _)) => commands::today(&dates, output)?,
        Some(("key", args)) => commands::key(
            &dates,
            required(args, "branch")?,
            required(args, "role")?,
            args.get_one::<String>("date").map(String::as_str),
            args.get_flag("strict"),
            output,
        )?,
        Some(("format", args)) => commands::format(
            &dates,
            required(args, "input")?,
            args.get_one::<String>("pattern").map(String::as_str),
            args.get_flag("time"),
            output,
        )?,
        Some(("access", args)) => commands::access(
            &config,
            required(args, "role")?,
            required(args, "capability")?,
            args.get_one::<String>("preview-as").map(String::as_str),
            output,
        )?,
        _ => return Ok(()),
    };

    println!("{rendered}");
    Ok(())
}

fn required<'a>(args: &'a clap::ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing --{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn access_requires_capability() {
        let result = cli().try_get_matches_from(["guidebook", "access", "--role", "admin"]);
        assert!(result.is_err());
    }

    #[test]
    fn time_conflicts_with_pattern() {
        let result = cli().try_get_matches_from([
            "guidebook", "format", "--input", "2024-03-01", "--time", "--pattern", "%Y",
        ]);
        assert!(result.is_err());
    }
}
