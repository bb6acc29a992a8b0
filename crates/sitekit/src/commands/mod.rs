//! Command dispatch.

mod blogs;
mod config_cmd;
mod projects;
mod resource;
mod services;
mod util;

use clap::CommandFactory;

use sitekit_core::{BlogPost, Project, Service};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Route a parsed command to its handler.
///
/// Only collection commands resolve a profile and build a backend.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Config(args) => config_cmd::handle(args, global),

        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "sitekit", &mut std::io::stdout());
            Ok(())
        }

        Command::Blogs(args) => {
            resource::handle::<BlogPost>(&config::connect(global)?, args, global).await
        }
        Command::Projects(args) => {
            resource::handle::<Project>(&config::connect(global)?, args, global).await
        }
        Command::Services(args) => {
            resource::handle::<Service>(&config::connect(global)?, args, global).await
        }
    }
}
