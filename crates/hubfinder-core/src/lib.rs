pub mod criteria;
pub mod delegation;
pub mod grid;
pub mod models;
pub mod ranking;
pub mod rules;
pub mod spatial;

pub use criteria::evaluate;
pub use delegation::{build_prompt, parse_reply, DelegatedPick, DelegationError, PickRecord};
pub use grid::{generate_grid, GridError};
pub use models::{
    BoundingBox, DataQuality, GridPoint, PlaceRecord, PoiCategory, ProximityCount,
    QualificationFlags, RankedZone, SearchArea, WeatherReading, ZoneProfile,
};
pub use ranking::{evaluate_all, select_top};
pub use rules::SitingRules;
pub use spatial::{count_by_band, haversine_distance};
