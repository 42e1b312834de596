use clap::Parser;
use tsk::cli::commands::Cli;
use tsk::cli::handlers;
use tsk::{io::paths, logging};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI; the terminal is taken, so log to a file
            let _guard = logging::init_tui(cli.verbose, &paths::log_dir());
            if let Err(e) = tsk::tui::run(cli.db.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_cli(cli.verbose);
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
