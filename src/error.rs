use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Configuration errors, fatal before any training step
    InvalidLayerConfiguration(String),
    InvalidConfig(String),
    EmptyModel,
    EmptyDataset(String),
    LabelOutOfRange { label: usize, classes: usize },

    // Dimension mismatches, raised per sample before gradients are touched
    InvalidInputShape(String),
    InvalidOutputShape(String),
    LayerShapeMismatch(String),

    // A worker died mid mini-batch; its partial gradients are discarded
    WorkerPanicked(String),
    ThreadPoolError(rayon::ThreadPoolBuildError),

    // File operations
    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),
    ConfigParseError(serde_json::Error),
    CsvError(csv::Error),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidLayerConfiguration(msg) => write!(f, "Invalid layer configuration: {}", msg),
            NNError::InvalidConfig(msg) => write!(f, "Invalid training configuration: {}", msg),
            NNError::EmptyModel => write!(f, "Network needs at least an input and an output layer"),
            NNError::EmptyDataset(which) => write!(f, "{} data is empty", which),
            NNError::LabelOutOfRange { label, classes } => {
                write!(f, "Label {} out of range for {} classes", label, classes)
            }
            NNError::InvalidInputShape(msg) => write!(f, "Invalid input shape: {}", msg),
            NNError::InvalidOutputShape(msg) => write!(f, "Invalid output shape: {}", msg),
            NNError::LayerShapeMismatch(msg) => write!(f, "Layer shape mismatch: {}", msg),
            NNError::WorkerPanicked(msg) => write!(f, "Worker panicked during mini-batch: {}", msg),
            NNError::ThreadPoolError(err) => write!(f, "Failed to build worker pool: {}", err),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            NNError::ConfigParseError(err) => write!(f, "Config parse error: {}", err),
            NNError::CsvError(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl From<serde_json::Error> for NNError {
    fn from(err: serde_json::Error) -> NNError {
        NNError::ConfigParseError(err)
    }
}

impl From<csv::Error> for NNError {
    fn from(err: csv::Error) -> NNError {
        NNError::CsvError(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for NNError {
    fn from(err: rayon::ThreadPoolBuildError) -> NNError {
        NNError::ThreadPoolError(err)
    }
}

impl Error for NNError {}

pub type Result<T> = std::result::Result<T, NNError>;
