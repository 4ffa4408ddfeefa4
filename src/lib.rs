pub mod bounds;
pub mod check;
pub mod error;
pub mod settings;
pub mod tiles;

pub use bounds::{BoundingBox, LatLon};
pub use error::ConfigError;
pub use settings::Settings;
pub use tiles::TileUrlTemplate;
