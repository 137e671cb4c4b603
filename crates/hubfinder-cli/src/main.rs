//! hubfinder - rank candidate zones for a new drone logistics station.

mod report;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use hubfinder_core::models::{BoundingBox, SearchArea};
use hubfinder_core::rules::{DEFAULT_TOP_N, MAX_TOP_N};
use hubfinder_core::{evaluate, generate_grid, select_top, SitingRules};
use hubfinder_services::config::DEFAULT_ELEVATION_FALLBACK_M;
use hubfinder_services::elevation::{GoogleElevationClient, OpenMeteoElevationClient};
use hubfinder_services::genai::GeminiClient;
use hubfinder_services::places::GooglePlacesClient;
use hubfinder_services::weather::NasaPowerClient;
use hubfinder_services::{
    delegate_selection, ElevationSource, ServiceConfig, SimulatedSource, Sources, WeatherSource,
    ZoneEnricher,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Threshold rules plus composite ranking
    Local,
    /// Ask the text generation service to pick the zones
    Delegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WeatherMode {
    Simulated,
    NasaPower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ElevationMode {
    Google,
    OpenMeteo,
    Simulated,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Selection strategy
    #[arg(long, value_enum, default_value_t = Strategy::Local)]
    strategy: Strategy,

    /// Weather data source
    #[arg(long, value_enum, default_value_t = WeatherMode::Simulated)]
    weather: WeatherMode,

    /// Elevation data source
    #[arg(long, value_enum, default_value_t = ElevationMode::Google)]
    elevation: ElevationMode,

    /// Zones enriched concurrently (1 = one after another)
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Samples per axis
    #[arg(long, default_value_t = 5)]
    divisions: usize,

    #[arg(long, default_value_t = -0.35, allow_negative_numbers = true)]
    lat_min: f64,

    #[arg(long, default_value_t = -0.10, allow_negative_numbers = true)]
    lat_max: f64,

    #[arg(long, default_value_t = -78.60, allow_negative_numbers = true)]
    lon_min: f64,

    #[arg(long, default_value_t = -78.35, allow_negative_numbers = true)]
    lon_max: f64,

    /// Zones listed in the final ranking (1 to 3)
    #[arg(
        long,
        default_value_t = DEFAULT_TOP_N,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_TOP_N as u64)
    )]
    top: usize,

    /// Seed for simulated values
    #[arg(long)]
    seed: Option<u64>,

    /// City name used in the report and the delegation prompt
    #[arg(long, default_value = "Quito")]
    city: String,
}

impl Args {
    fn search_area(&self) -> SearchArea {
        SearchArea {
            bounds: BoundingBox {
                lat_min: self.lat_min,
                lat_max: self.lat_max,
                lon_min: self.lon_min,
                lon_max: self.lon_max,
            },
            divisions: self.divisions,
        }
    }
}

/// Wire real and simulated sources according to the flags.
fn compose_sources(args: &Args, config: &ServiceConfig) -> Result<Sources> {
    if config.google_api_key.trim().is_empty() {
        bail!("GOOGLE_MAPS_API_KEY is not set; nearby search needs it");
    }
    let http = config.http_client()?;

    let band = config
        .elevation_fallback_m
        .unwrap_or(DEFAULT_ELEVATION_FALLBACK_M);
    let simulated = Arc::new(match args.seed {
        Some(seed) => SimulatedSource::seeded(seed, band),
        None => SimulatedSource::new(band),
    });

    let elevation: Arc<dyn ElevationSource> = match args.elevation {
        ElevationMode::Google => Arc::new(GoogleElevationClient::new(
            http.clone(),
            &config.elevation_url,
            &config.google_api_key,
        )),
        ElevationMode::OpenMeteo => Arc::new(OpenMeteoElevationClient::new(
            http.clone(),
            &config.open_meteo_url,
        )),
        ElevationMode::Simulated => simulated.clone(),
    };

    let weather: Arc<dyn WeatherSource> = match args.weather {
        WeatherMode::Simulated => simulated.clone(),
        WeatherMode::NasaPower => Arc::new(NasaPowerClient::new(
            http.clone(),
            &config.power_url,
            config.weather_start,
            config.weather_end,
        )),
    };

    let elevation_fallback: Option<Arc<dyn ElevationSource>> = match config.elevation_fallback_m {
        Some(_) => Some(simulated.clone() as Arc<dyn ElevationSource>),
        None => None,
    };

    Ok(Sources {
        carbon: simulated,
        elevation,
        elevation_fallback,
        weather,
        places: Arc::new(GooglePlacesClient::new(
            http,
            &config.places_url,
            &config.google_api_key,
        )),
    })
}

fn text_generator(config: &ServiceConfig) -> Result<GeminiClient> {
    if config.gemini_api_key.trim().is_empty() {
        bail!("GEMINI_API_KEY is not set; the delegate strategy needs it");
    }
    Ok(GeminiClient::new(
        config.http_client()?,
        &config.gemini_url,
        &config.gemini_api_key,
        &config.gemini_model,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hubfinder=info".parse()?)
                .add_directive("hubfinder_services=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = ServiceConfig::from_env();
    let rules = SitingRules {
        top_n: args.top,
        ..SitingRules::default()
    };

    let points = generate_grid(&args.search_area()).context("invalid search area")?;
    let sources = compose_sources(&args, &config)?;
    let generator = match args.strategy {
        Strategy::Delegate => Some(text_generator(&config)?),
        Strategy::Local => None,
    };

    tracing::info!(
        "Evaluating {} zones in {} with {} worker(s), strategy {:?}",
        points.len(),
        args.city,
        args.workers.max(1),
        args.strategy
    );

    let enricher = ZoneEnricher::new(sources);
    let stream = enricher.enrich_stream(&points, args.workers);
    futures::pin_mut!(stream);

    let mut profiles = Vec::with_capacity(points.len());
    while let Some(profile) = stream.next().await {
        let flags = match args.strategy {
            Strategy::Local => Some(evaluate(&profile, &rules)),
            Strategy::Delegate => None,
        };
        print!("{}", report::zone_diagnostics(&profile, flags.as_ref()));
        profiles.push(profile);
    }

    let degraded = profiles
        .iter()
        .filter(|profile| profile.quality.is_degraded())
        .count();
    if degraded > 0 {
        tracing::warn!("{} of {} zones have degraded data", degraded, profiles.len());
    }

    match generator {
        None => {
            let ranked = select_top(&profiles, &rules);
            print!("{}", report::ranking_summary(&args.city, &ranked));
        }
        Some(generator) => {
            let picks = delegate_selection(&generator, &args.city, &profiles)
                .await
                .context("delegated selection failed")?;
            print!("{}", report::delegation_summary(&args.city, &picks, &profiles));
        }
    }

    Ok(())
}
