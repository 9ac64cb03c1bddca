mod cli;

use mp3forge::{
    config,
    conversion::{ConversionHandler, ConversionRequest},
    server,
};
use mp3forge_av::{check_tools as probe_tools, ExtractorBackend};
use mp3forge_common::Bitrate;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting mp3forge server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mp3forge=trace,mp3forge_av=trace,tower_http=debug".to_string()
        } else {
            "mp3forge=debug,mp3forge_av=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Convert {
            input,
            bitrate,
            name,
            output_dir,
            backend,
        } => convert_file(
            &input,
            cli.config.as_deref(),
            bitrate,
            name,
            output_dir,
            backend,
        ),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate { path } => {
            let path = path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mp3forge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert_file(
    input: &Path,
    config_path: Option<&Path>,
    bitrate: Option<Bitrate>,
    name: Option<String>,
    output_dir: Option<PathBuf>,
    backend: Option<ExtractorBackend>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(backend) = backend {
        config.conversion.backend = backend;
    }

    // Verify input file exists
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let source_bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let source_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bitrate = bitrate.unwrap_or(config.conversion.default_bitrate);

    let handler = ConversionHandler::from_config(&config)?;
    tracing::info!(
        "Converting {:?} at {} with the {} backend",
        input,
        bitrate,
        handler.backend_name()
    );

    let request = ConversionRequest::new(source_bytes, source_name, bitrate).with_custom_name(name);
    let result = handler.convert(request);

    if !result.succeeded {
        anyhow::bail!(
            "Conversion failed: {}",
            result.error_message.unwrap_or_default()
        );
    }

    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let output_path = output_dir.join(&result.output_name);
    std::fs::write(&output_path, &result.output_bytes)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    println!("Converted: {}", input.display());
    println!("Output: {}", output_path.display());
    println!("Bitrate: {}", result.bitrate);
    if let Some(saved) = result.saved_to {
        println!("Copy saved to: {}", saved.display());
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = probe_tools(config.tools.ffmpeg_path.as_deref());
    let mut ffmpeg_ok = false;

    for tool in &tools {
        let status = if tool.available { "✓" } else { "✗" };
        if tool.name == "ffmpeg" && tool.available {
            ffmpeg_ok = true;
        }

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if ffmpeg_ok {
        println!("ffmpeg is available, MP3 conversion is enabled!");
    } else {
        println!("ffmpeg is missing. Install it to enable MP3 conversion, or use the passthrough backend.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config_summary(&config);
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Upload limit: {} MB", config.server.max_upload_mb);
    println!("  Backend: {}", config.conversion.backend);
    println!("  Default bitrate: {}", config.conversion.default_bitrate);
    match config.conversion.destination_dir {
        Some(ref dir) => println!("  Destination: {}", dir.display()),
        None => println!("  Destination: (download only)"),
    }
    println!("  History size: {}", config.history.capacity);
}
