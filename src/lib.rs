extern crate plotters;

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;
pub mod validation;

// Re-export types
pub use crate::config::{load_config, TrainingConfig};
pub use crate::core::{Activation, Cost, Dense, HyperParameters, Init, Layer, WorkerBuffer, Workers};
pub use crate::data::Dataset;
pub use crate::error::{NNError, Result};
pub use crate::models::{History, Network};

pub mod plot {
    pub mod plot_cost_over_epochs;
}
