//! Waymark CLI Library
//!
//! Command-line layer, turns parsed arguments into Core library calls.

pub mod cli;
mod handlers;
mod state;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands};
pub use state::AppState;

/// Run a parsed command against loaded state and return what should be printed
pub fn execute(state: &AppState, command: &Commands) -> anyhow::Result<String> {
    match command {
        Commands::Normalize { text } => Ok(handlers::handle_normalize(state, text)),
        Commands::Resolve { site, path } => handlers::handle_resolve(state, site, path),
        Commands::Url(args) => handlers::handle_url(state, args),
        Commands::Request(args) => handlers::handle_request(state, args),
    }
}
