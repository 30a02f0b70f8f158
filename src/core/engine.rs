//! Data-parallel gradient computation over one mini-batch.
//!
//! Sample `i` of a batch goes to worker `i % n_cores`. Each worker runs
//! forward and backward passes for its samples inside its own
//! [`WorkerBuffer`], so the parallel phase shares nothing mutable. The
//! parallel iterator returning is the only barrier; after it, the merge runs
//! on the calling thread alone.

use std::panic::{self, AssertUnwindSafe};

use log::debug;
use rayon::prelude::*;

use crate::prelude::*;

pub struct Workers {
    buffers: Vec<WorkerBuffer>,
    pool: rayon::ThreadPool,
}

impl Workers {
    /// `n_cores` scratch buffers for a network with the given layer sizes,
    /// plus a dedicated thread pool of the same width.
    pub fn new(sizes: &[usize], n_cores: usize) -> Result<Self> {
        if n_cores == 0 {
            return Err(NNError::InvalidConfig("n_cores must be at least 1".to_string()));
        }
        let buffers = (0..n_cores)
            .map(|_| WorkerBuffer::new(sizes))
            .collect::<Result<Vec<_>>>()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_cores)
            .thread_name(|i| format!("sgd-worker-{}", i))
            .build()?;
        Ok(Self { buffers, pool })
    }

    pub fn n_cores(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffers(&self) -> &[WorkerBuffer] {
        &self.buffers
    }

    /// Gradients of the whole mini-batch once [`Workers::run_mini_batch`] returned.
    pub fn merged(&self) -> &WorkerBuffer {
        &self.buffers[0]
    }

    /// Zero every worker's accumulators.
    pub fn reset(&mut self) {
        for buf in &mut self.buffers {
            buf.zero_gradients();
        }
    }

    /// Accumulate the gradients of `batch` and merge them into worker 0.
    ///
    /// Every sample is checked against the network's layer sizes before any
    /// accumulator is written. A failing or panicking worker fails the whole
    /// batch and leaves all accumulators zeroed.
    pub fn run_mini_batch(&mut self, network: &Network, batch: &[(&Array1<f64>, &Array1<f64>)]) -> Result<()> {
        if !self.buffers[0].fits(network.sizes()) {
            return Err(NNError::LayerShapeMismatch(format!(
                "worker buffers sized {:?} but network has sizes {:?}",
                self.buffers[0].sizes(),
                network.sizes()
            )));
        }
        for (i, (x, y)) in batch.iter().enumerate() {
            if let Err(e) = network.check_sample(x, y) {
                debug!("rejecting mini-batch at sample {}: {}", i, e);
                return Err(e);
            }
        }

        let n_cores = self.n_cores();
        let buffers = &mut self.buffers;
        let pool = &self.pool;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(|| {
                buffers.par_iter_mut().enumerate().try_for_each(|(p, buf)| {
                    for (x, y) in batch.iter().skip(p).step_by(n_cores) {
                        network.forward(x, buf)?;
                        network.backward(y, buf)?;
                    }
                    Ok(())
                })
            })
        }));

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(NNError::WorkerPanicked(panic_message(payload.as_ref()))),
        };
        if let Err(e) = result {
            self.reset();
            return Err(e);
        }

        merge_into_first(&mut self.buffers);
        debug!(
            "mini-batch of {} samples merged from {} workers",
            self.buffers[0].samples,
            n_cores
        );
        Ok(())
    }
}

/// Sum every buffer's accumulators into the first one.
pub fn merge_into_first(buffers: &mut [WorkerBuffer]) {
    if let Some((first, rest)) = buffers.split_first_mut() {
        for other in rest.iter() {
            first.absorb(other);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
