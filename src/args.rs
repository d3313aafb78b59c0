use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use workbench::server::DEFAULT_FIXTURE_ITEMS;
use workbench::workspace::remote::DEFAULT_SERVER_URL;

/// Command line configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the companion file server
    Serve(ServeArgs),

    /// Download a file from the file server and print it
    Fetch {
        filename: String,

        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },

    /// Upload a local file to the file server
    Push {
        filename: String,

        /// Local file whose content is uploaded
        source: PathBuf,

        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },

    /// Ask the file server to generate the big JSON fixture
    Generate {
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },

    /// Print the lines of CURRENT that were added relative to ORIGINAL
    Diff { original: PathBuf, current: PathBuf },

    /// Open a folder as a workspace and print its tree
    Tree { dir: PathBuf },
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    pub port: u16,

    /// Directory served under /file
    #[arg(long, default_value = "files")]
    pub files_dir: PathBuf,

    /// Number of records written by /generate-big-json
    #[arg(long, default_value_t = DEFAULT_FIXTURE_ITEMS)]
    pub fixture_items: usize,
}
