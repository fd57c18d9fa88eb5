use clap::{Parser, Subcommand};
use cli::ServerConfig;
use color_eyre::eyre::{Result, WrapErr};
use plot_extract::{
    server::{start_server, AppState},
    CandidateOrdering, ExtractionSession, PlotBoundaryRecord,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plot boundaries from one layout sheet
    Extract {
        /// Path to the layout image
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the plot records as JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the plots as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Path to a .toml or .json configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the candidate ordering (discovery or spatial)
        #[arg(long)]
        ordering: Option<CandidateOrdering>,
    },
    /// Serve the upload and plots endpoints over HTTP
    Serve {
        /// Path to a .toml or .json configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the bind address, e.g. 0.0.0.0:8000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Write a configuration file with default values
    InitConfig {
        /// Destination (.toml or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the plot record list
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output, geojson, config, ordering } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(ordering) = ordering {
                config.ordering = ordering;
            }
            extract(&config, &input, output.as_deref(), geojson.as_deref())?;
        }
        Commands::Serve { config, bind } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            serve(config).await?;
        }
        Commands::InitConfig { output } => {
            ServerConfig::default().to_file(&output)?;
            info!("Default configuration written to {:?}", output);
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(Vec<PlotBoundaryRecord>);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn extract(
    config: &ServerConfig,
    input: &Path,
    output: Option<&Path>,
    geojson: Option<&Path>,
) -> Result<()> {
    let pipeline = config.build_pipeline()?;
    info!("{}", pipeline.info());

    let bytes = std::fs::read(input)
        .wrap_err_with(|| format!("Failed to read layout image {:?}", input))?;
    let result = pipeline.run(&bytes)
        .wrap_err_with(|| format!("Failed to extract plots from {:?}", input))?;

    info!("Found {} plots in {:?}", result.len(), input);

    let geojson_plots = result.to_typed_geojson();
    let unlabelled: Vec<String> = geojson_plots
        .unlabelled_plots()
        .into_iter()
        .filter_map(|feature| feature.properties())
        .map(|props| props.plot_number)
        .collect();
    if !unlabelled.is_empty() {
        warn!("{} plots have no readable text: {}", unlabelled.len(), unlabelled.join(", "));
    }

    let json = serde_json::to_string_pretty(result.records())?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Plot records saved to: {:?}", path);
        }
        None => println!("{}", json),
    }

    if let Some(path) = geojson {
        result.save_geojson(path)?;
        info!("GeoJSON saved to: {:?}", path);
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> Result<()> {
    let pipeline = config.build_pipeline()?;
    info!("{}", pipeline.info());

    let session = Arc::new(ExtractionSession::with_pipeline(pipeline));
    let state = AppState::new(session).with_max_upload_bytes(config.max_upload_bytes);

    start_server(&config.bind_address, state)
        .await
        .wrap_err_with(|| format!("Server on {} stopped with an error", config.bind_address))?;

    Ok(())
}
