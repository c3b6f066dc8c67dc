use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> CliCommand {
    let args = env::args().skip(1).collect::<Vec<String>>();
    if args.is_empty() {
        return CliCommand::Run;
    }
    // The database rebuild is destructive, so it must be asked for by name and nothing else runs.
    if args.iter().any(|a| a == "--rebuild-db") {
        return CliCommand::RebuildDb;
    }
    display_readme();
    display_envs();
    CliCommand::HelpShown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the HTTP server.
    Run,
    /// Drop all drink records and re-provision the schema, then exit.
    RebuildDb,
    /// An unrecognized argument was given; help was printed.
    HelpShown,
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 8] = [
        "RUST_LOG",
        "ESP_HOST",
        "ESP_PORT",
        "ESP_DATABASE_URL",
        "ESP_AUTH_ISSUER",
        "ESP_AUTH_AUDIENCE",
        "ESP_AUTH_JWKS_URL",
        "ESP_CORS_ALLOWED_ORIGIN",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
