//! Index-paired training data and mini-batching.

use crate::prelude::*;

/// One mini-batch: borrowed `(input, target)` pairs.
pub type MiniBatch<'a> = Vec<(&'a Array1<f64>, &'a Array1<f64>)>;

/// Inputs and targets, paired by index.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub inputs: Vec<Array1<f64>>,
    pub outputs: Vec<Array1<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Array1<f64>>, outputs: Vec<Array1<f64>>) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(NNError::InvalidConfig(format!(
                "{} inputs but {} targets",
                inputs.len(),
                outputs.len()
            )));
        }
        Ok(Self { inputs, outputs })
    }

    /// Scale raw pixel bytes onto `[0, 1]` and one-hot encode the labels.
    pub fn from_labeled_bytes(images: &[Vec<u8>], labels: &[u8], classes: usize) -> Result<Self> {
        let inputs = images
            .iter()
            .map(|img| {
                let mut x: Array1<f64> = img.iter().map(|&p| p as f64).collect();
                x.to_unity(0.0, 255.0);
                x
            })
            .collect();
        let outputs = labels
            .iter()
            .map(|&label| one_hot(label as usize, classes))
            .collect::<Result<Vec<_>>>()?;
        Self::new(inputs, outputs)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&Array1<f64>, &Array1<f64>)> {
        self.inputs.iter().zip(self.outputs.iter())
    }

    /// Fisher-Yates shuffle applying the same permutation to inputs and targets.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.inputs.swap(i, j);
            self.outputs.swap(i, j);
        }
    }

    /// Consecutive batches of exactly `size` pairs. A trailing remainder
    /// shorter than `size` is dropped.
    pub fn mini_batches(&self, size: usize) -> Result<Vec<MiniBatch<'_>>> {
        if size == 0 {
            return Err(NNError::InvalidConfig("mini-batch size must be at least 1".to_string()));
        }
        let pairs: MiniBatch = self.pairs().collect();
        Ok(pairs.chunks_exact(size).map(|chunk| chunk.to_vec()).collect())
    }
}

/// Vector of `classes` zeros with a 1 at `label`.
pub fn one_hot(label: usize, classes: usize) -> Result<Array1<f64>> {
    if label >= classes {
        return Err(NNError::LabelOutOfRange { label, classes });
    }
    let mut v = Array1::zeros(classes);
    v[label] = 1.0;
    Ok(v)
}
