//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use common::Money;
use service::domain::{Bbox, Filter, LatLng, Zoom};

/// Headless client of the real estate sales map.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command of the [`Args`].
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the sales of an area, grouped by place.
    Sales {
        /// Area as `swLng,swLat,neLng,neLat`.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Bbox,

        /// Zoom level the area is seen at.
        #[arg(long, default_value = "12")]
        zoom: Zoom,

        /// Bounds of the printed sales.
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Prints the sales detail of a place.
    Detail {
        /// Latitude of the place.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the place.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Prints addresses matching a text.
    Search {
        /// Searched text.
        #[arg(required = true)]
        text: Vec<String>,

        /// Maximum number of printed addresses.
        #[arg(long)]
        limit: Option<u8>,
    },

    /// Prints cadastral parcels of a commune or at a point.
    Parcels {
        /// INSEE code of the commune (the configured one by default).
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        insee: Option<String>,

        /// Latitude of the point.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the point.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Runs an interactive map session reading commands from stdin.
    Session,
}

impl Command {
    /// Returns the point given to the [`Command::Parcels`], if any.
    ///
    /// [`None`] is returned for invalid coordinates too.
    #[must_use]
    pub fn point(lat: Option<f64>, lon: Option<f64>) -> Option<LatLng> {
        LatLng::new(lat?, lon?)
    }
}

/// [`Filter`] bounds given as command line arguments.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct FilterArgs {
    /// Minimal year of a sale.
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Maximal year of a sale.
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Minimal price of a sale.
    #[arg(long)]
    pub price_min: Option<Money>,

    /// Maximal price of a sale.
    #[arg(long)]
    pub price_max: Option<Money>,

    /// Minimal price per square meter of a sale.
    #[arg(long)]
    pub price_m2_min: Option<Money>,

    /// Maximal price per square meter of a sale.
    #[arg(long)]
    pub price_m2_max: Option<Money>,
}

impl From<FilterArgs> for Filter {
    fn from(value: FilterArgs) -> Self {
        let FilterArgs {
            year_min,
            year_max,
            price_min,
            price_max,
            price_m2_min,
            price_m2_max,
        } = value;
        Self {
            year_min,
            year_max,
            price_min,
            price_max,
            price_m2_min,
            price_m2_max,
        }
    }
}
