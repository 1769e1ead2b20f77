//! Command-line interface.
//!
//! Running without a subcommand starts the server.

mod commands;

use clap::{Parser, Subcommand};

/// Alumni Connect - alumni registration, nominations and sponsorships
#[derive(Parser)]
#[command(name = "alumni-connect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server with the background scheduler
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an admin account
    CreateAdmin {
        /// Login name for the new account
        username: String,

        /// Password for the new account
        #[arg(long, env = "ALUMNI_CONNECT_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Allow the account to delete records
        #[arg(long)]
        superuser: bool,
    },

    /// Delete expired verification codes once
    SweepOtps,

    /// Create default admins and fill empty course and country lists
    Seed,
}

pub use commands::*;
