//! Configuration for the F1 timing engine: driver name-mapping files
//! (JSON or YAML) and engine/listener settings.

pub mod error;
pub mod mapping;
pub mod settings;

pub use error::ConfigError;
pub use mapping::{
    DriverNameMapping, MappingFormat, NameMappingSet, load_mapping_sets, parse_mapping_sets,
    select_league,
};
pub use settings::EngineSettings;
