//! Per-worker scratch space for forward and backward passes.
//!
//! A mini-batch is split across workers and every worker owns one
//! `WorkerBuffer` outright while it runs, so no two threads ever write the
//! same array. The buffers are allocated once for a network's layer sizes and
//! reused for the whole training run: activations, `z` and `delta` are
//! overwritten on every sample, gradient accumulators are cleared once per
//! mini-batch.

use crate::prelude::*;
use crate::core::layers::vector_table;

#[derive(Debug, Clone)]
pub struct WorkerBuffer {
    /// `activations[k]` for `k in 0..=L`; `activations[0]` is the input.
    pub activations: Vec<Array1<f64>>,
    /// Pre-activations `z[k]` of layer `k + 1`, for `k in 0..L`.
    pub z: Vec<Array1<f64>>,
    /// Backpropagated error of layer `k + 1`, for `k in 0..L`.
    pub delta: Vec<Array1<f64>>,
    /// Weight gradient accumulators, shaped like the weights.
    pub nabla_w: Vec<Array2<f64>>,
    /// Bias gradient accumulators, shaped like the biases.
    pub nabla_b: Vec<Array1<f64>>,
    /// Samples accumulated since the last reset.
    pub samples: usize,
}

impl WorkerBuffer {
    pub fn new(sizes: &[usize]) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(NNError::EmptyModel);
        }
        let l = sizes.len() - 1;
        let boundary = Cols::PerLayer(sizes[1..].to_vec());
        // Constant initializers never draw from the generator.
        let mut rng = StdRng::seed_from_u64(0);

        Ok(Self {
            activations: vector_table(l + 1, &Cols::PerLayer(sizes.to_vec()), Init::zeros(), &mut rng)?,
            z: vector_table(l, &boundary, Init::zeros(), &mut rng)?,
            delta: vector_table(l, &boundary, Init::zeros(), &mut rng)?,
            nabla_w: (0..l).map(|k| Array2::zeros((sizes[k], sizes[k + 1]))).collect(),
            nabla_b: vector_table(l, &boundary, Init::zeros(), &mut rng)?,
            samples: 0,
        })
    }

    /// Layer sizes this buffer was allocated for.
    pub fn sizes(&self) -> Vec<usize> {
        self.activations.iter().map(|a| a.len()).collect()
    }

    pub fn fits(&self, sizes: &[usize]) -> bool {
        self.activations.len() == sizes.len()
            && self.activations.iter().zip(sizes).all(|(a, &s)| a.len() == s)
    }

    /// Clear the gradient accumulators without releasing their memory.
    pub fn zero_gradients(&mut self) {
        for nw in &mut self.nabla_w {
            nw.fill(0.0);
        }
        for nb in &mut self.nabla_b {
            nb.fill(0.0);
        }
        self.samples = 0;
    }

    pub fn is_zeroed(&self) -> bool {
        self.samples == 0
            && self.nabla_w.iter().all(|nw| nw.iter().all(|&v| v == 0.0))
            && self.nabla_b.iter().all(|nb| nb.iter().all(|&v| v == 0.0))
    }

    /// Adds another buffer's accumulators into this one.
    pub fn absorb(&mut self, other: &WorkerBuffer) {
        for (nw, other_nw) in self.nabla_w.iter_mut().zip(&other.nabla_w) {
            *nw += other_nw;
        }
        for (nb, other_nb) in self.nabla_b.iter_mut().zip(&other.nabla_b) {
            *nb += other_nb;
        }
        self.samples += other.samples;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_shaped_by_layer_sizes() {
        let buf = WorkerBuffer::new(&[3, 4, 2]).unwrap();
        assert_eq!(buf.sizes(), vec![3, 4, 2]);
        assert_eq!(buf.z.iter().map(|z| z.len()).collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(buf.delta.len(), 2);
        assert_eq!(buf.nabla_w[0].dim(), (3, 4));
        assert_eq!(buf.nabla_w[1].dim(), (4, 2));
        assert_eq!(buf.nabla_b[1].len(), 2);
        assert!(buf.is_zeroed());
    }

    #[test]
    fn single_layer_networks_are_rejected() {
        assert!(WorkerBuffer::new(&[5]).is_err());
    }

    #[test]
    fn zero_gradients_keeps_activations_and_clears_accumulators() {
        let mut buf = WorkerBuffer::new(&[2, 2]).unwrap();
        buf.activations[0].fill(3.0);
        buf.nabla_w[0].fill(1.5);
        buf.nabla_b[0].fill(-2.0);
        buf.samples = 4;
        assert!(!buf.is_zeroed());

        buf.zero_gradients();
        assert!(buf.is_zeroed());
        assert_eq!(buf.activations[0], array![3.0, 3.0]);
    }

    #[test]
    fn absorb_sums_accumulators() {
        let mut a = WorkerBuffer::new(&[2, 1]).unwrap();
        let mut b = WorkerBuffer::new(&[2, 1]).unwrap();
        a.nabla_w[0].fill(1.0);
        b.nabla_w[0].fill(2.0);
        b.nabla_b[0].fill(0.5);
        a.samples = 1;
        b.samples = 2;

        a.absorb(&b);
        assert_eq!(a.nabla_w[0], array![[3.0], [3.0]]);
        assert_eq!(a.nabla_b[0], array![0.5]);
        assert_eq!(a.samples, 3);
    }
}
