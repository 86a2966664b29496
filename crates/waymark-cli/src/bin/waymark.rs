//! Waymark CLI Binary Entry Point

use std::process;

use clap::Parser;
use waymark_cli::{execute, AppState, Cli};

fn main() {
    let cli = Cli::parse();

    let state = match AppState::load(cli.config.as_deref(), cli.tree.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let filter = env_logger::Env::default().default_filter_or(state.log_level(cli.verbose));
    env_logger::Builder::from_env(filter).init();

    if let Ok(store) = state.store() {
        if store.is_empty() {
            log::warn!("content tree is empty, no request will resolve");
        } else {
            log::debug!("loaded {} nodes into store {}", store.len(), state.config.store);
        }
    }

    match execute(&state, &cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
