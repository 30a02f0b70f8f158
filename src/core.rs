// src/core.rs
pub mod activations;
pub mod engine;
pub mod layers;
pub mod losses;
pub mod normalization;
pub mod optimizers;
pub mod output;
pub mod scratch;

// Re-export commonly used items
pub use activations::Activation;
pub use engine::Workers;
pub use layers::{Cols, Dense, Init, Layer};
pub use losses::Cost;
pub use normalization::Normalization;
pub use optimizers::{HyperParameters, apply_update};
pub use output::write_history_to_csv;
pub use scratch::WorkerBuffer;
