pub use serde::{Serialize, Deserialize};
pub use std::fs::File;
pub use std::io::{Read, Write};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::{StandardNormal, Uniform};
pub use rand::{Rng, SeedableRng};
pub use rand::rngs::StdRng;

pub use crate::config::TrainingConfig;
pub use crate::data::{Dataset, MiniBatch};
pub use crate::error::*;
pub use crate::models::{EpochReport, History, Network};

// Internal re-exports
pub use crate::core::{
    Activation,
    Cols,
    Cost,
    Dense,
    HyperParameters,
    Init,
    Layer,
    Normalization,
    WorkerBuffer,
    Workers,
    apply_update,
};
