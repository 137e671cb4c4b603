//! Data sources and the enrichment pipeline for station site selection.

pub mod config;
pub mod delegate;
pub mod elevation;
pub mod enrich;
pub mod error;
pub mod genai;
pub mod places;
pub mod sources;
pub mod weather;

pub use config::ServiceConfig;
pub use delegate::{delegate_selection, DelegateError};
pub use enrich::{Sources, ZoneEnricher};
pub use error::SourceError;
pub use sources::{
    CarbonSource, ElevationSource, PlaceQuery, PlacesSource, SimulatedSource, TextGenerator,
    WeatherSource,
};
