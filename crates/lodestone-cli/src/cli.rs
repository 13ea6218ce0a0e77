use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lodestone", about = "Lodestone profile maintenance tool")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/lodestone.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Print a stored user as JSON
    ShowUser {
        #[arg(long)]
        user: String,
    },
    /// Apply an update request (JSON file, or `-` for stdin) to a user
    UpdateProfile {
        #[arg(long)]
        user: String,
        #[arg(long)]
        request: String,
        /// Run the checks and print the report without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Register a world so it can be chosen as a home location
    CreateWorld {
        #[arg(long)]
        name: String,
        #[arg(long)]
        author: String,
        /// Publish the world instead of keeping it private
        #[arg(long)]
        public: bool,
    },
    /// Grant or revoke the staff flag
    SetStaff {
        #[arg(long)]
        user: String,
        #[arg(long)]
        revoke: bool,
    },
}
