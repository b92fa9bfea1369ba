use clap::Parser;
use credvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Create { ref name } => credvault::cli::commands::create::execute(&cli, name),
        Commands::Databases => credvault::cli::commands::databases::execute(&cli),
        Commands::List { ref db, reveal } => {
            credvault::cli::commands::list::execute(&cli, db, reveal)
        }
        Commands::Show { ref db, index } => {
            credvault::cli::commands::show::execute(&cli, db, index)
        }
        Commands::Add {
            ref db,
            ref title,
            ref username,
            ref url,
            ref notes,
        } => credvault::cli::commands::add::execute(&cli, db, title, username, url, notes),
        Commands::Remove {
            ref db,
            index,
            force,
        } => credvault::cli::commands::remove::execute(&cli, db, index, force),
        Commands::Completions { shell } => credvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises credvault's own level.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "error",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("credvault={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
