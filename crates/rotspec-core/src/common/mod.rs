pub mod config;
pub mod constants;

pub use config::{
    load_analysis_config, AnalysisConfig, BandConfig, ConfigError, InstrumentConfig, ProfileKind,
    TemperatureGridConfig,
};
