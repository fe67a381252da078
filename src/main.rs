//! Gist CLI - manage GitHub gists from the command line.

use clap::Parser;
use gist::cli::{Cli, Commands};
use gist::commands;
use gist::config::Config;
use gist::format;
use gist::remote::GitHubRemote;
use std::io;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands) -> gist::Result<()> {
    // Configuration is resolved once, before dispatch.
    let config = Config::load()?;
    init_logging(&config);

    let api = GitHubRemote::new(&config);
    let width = format::terminal_width();
    let mut out = io::stdout().lock();

    match command {
        Commands::List => commands::list(&api, width, &mut out),
        Commands::Edit { id } => commands::edit(&api, &id),
        Commands::Description { id, desc } => commands::description(&api, &id, &desc),
        Commands::Info { id } => commands::info(&api, &id, &mut out),
        Commands::Fork { id } => commands::fork(&api, &id),
        Commands::Files { id } => commands::files(&api, &id, &mut out),
        Commands::Delete { ids } => commands::delete(&api, &ids),
        Commands::Archive { id } => commands::archive(&api, &id),
        Commands::Content {
            id,
            filename,
            decrypt,
        } => commands::content(&api, &config, &id, filename.as_deref(), decrypt, &mut out),
        Commands::Create {
            desc,
            public,
            encrypt,
            filename,
            files,
        } => commands::create(
            &api,
            &config,
            &desc,
            &files,
            filename.as_deref(),
            public,
            encrypt,
            &mut out,
        ),
        Commands::Clone { id, name } => commands::clone(&api, &id, name.as_deref()),
        Commands::Version => commands::version(&mut out),
    }
}

/// Route diagnostics to stderr at the level picked in the config file.
fn init_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();
}
