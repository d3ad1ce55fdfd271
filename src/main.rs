use ballotbox::cli::{self, Cli, Command};
use ballotbox::{config, logging};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init_logging(&cfg.logging) {
        eprintln!("Warning: {}", e);
    }

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Command::Run { script } => cli::handle_run(&script, &mut stdout),
        Command::Inspect { file, user } => cli::handle_inspect(&file, user.as_deref(), &mut stdout),
        Command::Version => {
            cli::handle_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
