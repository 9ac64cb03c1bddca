use clap::{Parser, Subcommand};
use mp3forge_av::ExtractorBackend;
use mp3forge_common::Bitrate;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mp3forge")]
#[command(author, version, about = "Extract MP3 audio from MP4 uploads")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server with the upload page
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Convert a single local file to MP3
    Convert {
        /// Video file to convert
        #[arg(required = true)]
        input: PathBuf,

        /// Audio bitrate in kbps (64, 96, 128, 192, 256 or 320)
        #[arg(short, long)]
        bitrate: Option<Bitrate>,

        /// Output file name without the .mp3 extension
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write the MP3 to (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Extraction backend (ffmpeg or passthrough)
        #[arg(long)]
        backend: Option<ExtractorBackend>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        path: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
