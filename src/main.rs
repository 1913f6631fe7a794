mod bugs_rs;
mod cli;
mod config;
mod error;
mod logging;
mod playlist_file;
mod ports;
mod services;
mod song;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};

use crate::{
    cli::{Action, CliApplication},
    config::Config,
    logging::init_tracing,
    ports::vendor::Vendor,
    services::vendors::http_client,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_EVERYWHERE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `playlist_everywhere=debug`
    #[arg(long, default_value = "warn", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Browser cookie export to try before asking for a paste
    #[arg(long, global = true)]
    cookie_file: Option<PathBuf>,

    /// Without a subcommand, actions are picked from a menu
    #[command(subcommand)]
    command: Option<Commands>,
}

fn is_file(s: &str) -> Result<PathBuf, String> {
    let p: PathBuf = s.into();
    if p.is_file() {
        Ok(p)
    } else {
        Err(format!("`{}` is not an existing file", s))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a vendor playlist to a playlist file
    Download {
        /// The vendor to download from
        #[arg(short, long, value_enum)]
        vendor: Vendor,

        /// The playlist file to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Recreate the playlists of a playlist file on a vendor
    Upload {
        /// The vendor to upload to
        #[arg(short, long, value_enum)]
        vendor: Vendor,

        /// The playlist file to read
        #[arg(short, long, value_parser = is_file)]
        input: Option<PathBuf>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args.log_level)?;

    tracing::debug!("Loading configuration");
    let mut config = {
        if let Some(config) = args.config {
            Config::from_file(&config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load playlist-everywhere config")?;
    if let Some(cookie_file) = &args.cookie_file {
        config = config.with_cookie_file(cookie_file);
    }

    let command = match args.command {
        Some(Commands::Config(config_commands)) => {
            match config_commands {
                ConfigCommands::CreateDefault => {
                    let path = Config::create_default()?;
                    println!("{}", path.display());
                }
                ConfigCommands::Path => match Config::config_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No default config path found"),
                },
            }
            return Ok(());
        }
        command => command,
    };

    let http = http_client(&config).wrap_err("Failed to build http client")?;
    let app = CliApplication::new(config, http);

    match command {
        Some(Commands::Download { vendor, output }) => {
            app.run_action(Action::Download, vendor, output).await;
        }
        Some(Commands::Upload { vendor, input }) => {
            app.run_action(Action::Upload, vendor, input).await;
        }
        Some(Commands::Config(_)) | None => app.run_interactive().await,
    }

    Ok(())
}
