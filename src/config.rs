//! Training configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! {
//!   "epochs": 30,
//!   "mini_batch_size": 10,
//!   "eta": 0.5,
//!   "lambda": 5.0,
//!   "n_cores": 4,
//!   "seed": 42
//! }
//! ```

use std::fs;

use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub mini_batch_size: usize,
    /// Learning rate.
    pub eta: f64,
    /// L2 regularization strength.
    pub lambda: f64,
    /// Reshuffle the training set before every epoch.
    pub shuffle: bool,
    /// Report hit rate and cost on the validation set after every epoch.
    pub validate: bool,
    /// Worker threads per mini-batch.
    pub n_cores: usize,
    /// Seed for shuffling; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            mini_batch_size: 10,
            eta: 0.5,
            lambda: 5.0,
            shuffle: true,
            validate: true,
            n_cores: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn hyper_parameters(&self) -> Result<HyperParameters> {
        HyperParameters::new(self.eta, self.lambda)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NNError::InvalidConfig("epochs must be at least 1".to_string()));
        }
        if self.mini_batch_size == 0 {
            return Err(NNError::InvalidConfig("mini_batch_size must be at least 1".to_string()));
        }
        if self.n_cores == 0 {
            return Err(NNError::InvalidConfig("n_cores must be at least 1".to_string()));
        }
        self.hyper_parameters()?;
        Ok(())
    }
}

/// Read a JSON training configuration from `path` and validate it.
pub fn load_config(path: &str) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("sgdnet-{}-{}.json", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn defaults_are_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.n_cores >= 1);
        assert_eq!(config.hyper_parameters().unwrap(), HyperParameters::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let path = write_temp("partial", r#"{ "epochs": 3, "eta": 0.1, "seed": 7 }"#);
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.epochs, 3);
        assert_eq!(config.eta, 0.1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.mini_batch_size, 10);
        assert_eq!(config.lambda, 5.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for bad in [
            TrainingConfig { epochs: 0, ..TrainingConfig::default() },
            TrainingConfig { mini_batch_size: 0, ..TrainingConfig::default() },
            TrainingConfig { n_cores: 0, ..TrainingConfig::default() },
            TrainingConfig { eta: 0.0, ..TrainingConfig::default() },
            TrainingConfig { lambda: -1.0, ..TrainingConfig::default() },
        ] {
            assert!(matches!(bad.validate(), Err(NNError::InvalidConfig(_))));
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = write_temp("malformed", "{ epochs: ");
        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, NNError::ConfigParseError(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(load_config("/no/such/config.json"), Err(NNError::IoError(_))));
    }
}
