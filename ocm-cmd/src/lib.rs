//! Command implementations for the ocm CLI.
//!
//! Provides subcommands for inspecting and editing shareable URLs,
//! planning geometry fetches for a viewport, and loading area data from
//! the backend.

use clap::Subcommand;
use ocm_core::config::MapConfig;

pub mod areas;
pub mod geometries;
pub mod url;
pub mod viewport;

#[derive(Subcommand)]
pub enum Command {
    /// Print the shareable state and typed parameters of a query string
    DecodeUrl {
        /// Query string, with or without the leading '?'
        query: String,
    },

    /// Add or remove values in a query string
    EncodeUrl {
        query: String,

        /// key=value to set (scalar keys) or append (array keys)
        #[arg(short = 's', long = "set")]
        set: Vec<String>,

        /// key=value to remove; scalar keys are removed whatever the value
        #[arg(short = 'r', long = "remove")]
        remove: Vec<String>,
    },

    /// Decide whether a viewport needs new geometries
    Viewport {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long)]
        zoom: u32,

        #[arg(long, default_value_t = 800.0)]
        width: f64,

        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Resolution level currently shown (1-3)
        #[arg(long, default_value_t = 1)]
        resolution: i64,

        /// Last coverage region as JSON
        #[arg(long)]
        last: Option<String>,
    },

    /// Load the areas selected in a query string from the backend
    Areas {
        query: String,

        /// Write every area's series to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },

    /// Fetch the geometries for the view stored in a query string
    Geometries {
        query: String,

        #[arg(long, default_value_t = 800.0)]
        width: f64,

        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
}

pub async fn run(command: Command, config: MapConfig) -> anyhow::Result<()> {
    match command {
        Command::DecodeUrl { query } => url::run_decode_url(&query, &config),
        Command::EncodeUrl { query, set, remove } => url::run_encode_url(&query, &set, &remove),
        Command::Viewport {
            lat,
            lng,
            zoom,
            width,
            height,
            resolution,
            last,
        } => viewport::run_viewport(
            viewport::ViewportArgs {
                lat,
                lng,
                zoom,
                width,
                height,
                resolution,
                last,
            },
            &config,
        ),
        Command::Areas { query, csv } => areas::run_areas(&query, csv.as_deref(), config).await,
        Command::Geometries {
            query,
            width,
            height,
        } => geometries::run_geometries(&query, width, height, config).await,
    }
}
