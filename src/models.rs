use crate::prelude::*;
use crate::core::losses::l2_penalty;
use crate::core::optimizers;
use crate::validation::hit_rate;
use log::{debug, info, warn};
use ndarray::linalg::{general_mat_mul, general_mat_vec_mul};

/// Feed-forward network: layer descriptors, parameters and training setup.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    /// `dense[k]` connects layer `k` to layer `k + 1`.
    pub dense: Vec<Dense>,
    pub cost: Cost,
    pub hp: HyperParameters,
    sizes: Vec<usize>,
}

/// What one epoch of [`Network::fit`] reported.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub hit_rate: Option<f64>,
    pub cost: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct History {
    pub epochs: Vec<EpochReport>,
}

impl History {
    pub fn costs(&self) -> Vec<f64> {
        self.epochs.iter().filter_map(|r| r.cost).collect()
    }
}

impl Network {
    /// Standard-normal weights and biases, as drawn from the thread RNG.
    pub fn new(layers: &[Layer], cost: Cost, hp: HyperParameters) -> Result<Self> {
        Self::with_init(
            layers,
            cost,
            hp,
            Init::StandardNormal,
            Init::StandardNormal,
            &mut rand::thread_rng(),
        )
    }

    pub fn with_init<R: Rng + ?Sized>(
        layers: &[Layer],
        cost: Cost,
        hp: HyperParameters,
        weight_init: Init,
        bias_init: Init,
        rng: &mut R,
    ) -> Result<Self> {
        if layers.len() < 2 {
            return Err(NNError::EmptyModel);
        }
        hp.validate()?;

        let dense = layers
            .windows(2)
            .map(|pair| Dense::new(pair[0].size, pair[1].size, pair[1].activation, weight_init, bias_init, &mut *rng))
            .collect::<Result<Vec<_>>>()?;

        let output = layers[layers.len() - 1].activation;
        if !cost.pairs_with(output) {
            warn!(
                "{:?} cost with a {} output layer: the output delta is not the true gradient",
                cost,
                output.name()
            );
        }

        Ok(Self {
            layers: layers.to_vec(),
            dense,
            cost,
            hp,
            sizes: layers.iter().map(|l| l.size).collect(),
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Index `L` of the output layer.
    pub fn depth(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn count_parameters(&self) -> usize {
        self.dense.iter().map(|d| d.parameters()).sum()
    }

    pub fn summary(&self) -> String {
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        res.push_str(&format!("Input\t\t\t  (None, {})\t\t  0\n", self.sizes[0]));
        for layer in self.dense.iter() {
            res.push_str(&format!(
                "{} ({})\t\t  (None, {})\t\t  {}\n",
                layer.typ(),
                layer.activation.name(),
                layer.outputs(),
                layer.parameters()
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.count_parameters()));
        res.push_str(&format!("Cost: {:?}, eta: {}, lambda: {}\n", self.cost, self.hp.eta, self.hp.lambda));
        res
    }

    pub fn check_sample(&self, x: &Array1<f64>, y: &Array1<f64>) -> Result<()> {
        self.check_input(x)?;
        self.check_target(y)
    }

    fn check_input(&self, x: &Array1<f64>) -> Result<()> {
        if x.len() != self.sizes[0] {
            return Err(NNError::InvalidInputShape(format!(
                "input has length {}, input layer has {} neurons",
                x.len(),
                self.sizes[0]
            )));
        }
        Ok(())
    }

    fn check_target(&self, y: &Array1<f64>) -> Result<()> {
        let out = self.sizes[self.depth()];
        if y.len() != out {
            return Err(NNError::InvalidOutputShape(format!(
                "target has length {}, output layer has {} neurons",
                y.len(),
                out
            )));
        }
        Ok(())
    }

    fn check_scratch(&self, scratch: &WorkerBuffer) -> Result<()> {
        if !scratch.fits(&self.sizes) {
            return Err(NNError::LayerShapeMismatch(format!(
                "scratch buffer sized {:?} for network {:?}",
                scratch.sizes(),
                self.sizes
            )));
        }
        Ok(())
    }

    /// Feed `x` through the network inside `scratch` and return the output
    /// activations. Only `scratch.activations` and `scratch.z` are written.
    pub fn forward<'b>(&self, x: &Array1<f64>, scratch: &'b mut WorkerBuffer) -> Result<&'b Array1<f64>> {
        self.check_input(x)?;
        self.check_scratch(scratch)?;

        scratch.activations[0].assign(x);
        for (k, layer) in self.dense.iter().enumerate() {
            let (done, next) = scratch.activations.split_at_mut(k + 1);
            layer.forward_into(&done[k], &mut scratch.z[k], &mut next[0]);
        }
        Ok(&scratch.activations[self.depth()])
    }

    /// Backpropagate the error against target `y` from the state left by
    /// [`Network::forward`] and add this sample's gradients to the
    /// accumulators in `scratch`.
    pub fn backward(&self, y: &Array1<f64>, scratch: &mut WorkerBuffer) -> Result<()> {
        self.check_target(y)?;
        self.check_scratch(scratch)?;
        let l = self.depth();
        let WorkerBuffer { activations, z, delta, nabla_w, nabla_b, samples } = scratch;

        self.cost
            .delta_into(&z[l - 1], &activations[l], y, self.dense[l - 1].activation, &mut delta[l - 1]);

        for k in (0..l).rev() {
            if k + 1 < l {
                // delta[k] = (w[k+1] · delta[k+1]) ⊙ f'(z[k])
                let (lower, upper) = delta.split_at_mut(k + 1);
                general_mat_vec_mul(1.0, &self.dense[k + 1].w, &upper[0], 0.0, &mut lower[k]);
                lower[k] *= &self.dense[k].activation.prime(&z[k]);
            }
            nabla_b[k] += &delta[k];
            let a_col = activations[k].view().insert_axis(Axis(1));
            let d_row = delta[k].view().insert_axis(Axis(0));
            general_mat_mul(1.0, &a_col, &d_row, 1.0, &mut nabla_w[k]);
        }
        *samples += 1;
        Ok(())
    }

    /// Allocating forward pass, for evaluation outside the training loop.
    pub fn predict(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_input(x)?;
        let mut a = x.clone();
        for layer in self.dense.iter() {
            let z = a.dot(&layer.w) + &layer.b;
            a = layer.activation.forward(&z);
        }
        Ok(a)
    }

    /// Average per-sample cost plus the L2 penalty `lambda/(2N)·Σw²`.
    pub fn total_cost(&self, data: &Dataset) -> Result<f64> {
        if data.is_empty() {
            return Err(NNError::EmptyDataset("Cost".to_string()));
        }
        let mut cost = 0.0;
        for (x, y) in data.pairs() {
            self.check_sample(x, y)?;
            cost += self.cost.cost(&self.predict(x)?, y);
        }
        let n = data.len();
        let weights: Vec<&Array2<f64>> = self.dense.iter().map(|d| &d.w).collect();
        Ok(cost / n as f64 + l2_penalty(&weights, self.hp.lambda, n))
    }

    /// Apply the merged gradients held by `workers`, then zero every
    /// accumulator. `n` is the training set size, `m` the mini-batch size.
    ///
    /// A zero `n` or `m`, or workers sized for another network, fail before
    /// any parameter changes; the accumulators are zeroed either way.
    pub fn apply_update(&mut self, workers: &mut Workers, n: usize, m: usize) -> Result<()> {
        let checked = optimizers::check_sizes(n, m).and_then(|_| self.check_scratch(workers.merged()));
        if let Err(e) = checked {
            workers.reset();
            return Err(e);
        }
        let merged = workers.merged();
        for (k, layer) in self.dense.iter_mut().enumerate() {
            optimizers::apply_update(layer, &merged.nabla_w[k], &merged.nabla_b[k], &self.hp, n, m)?;
        }
        workers.reset();
        Ok(())
    }

    /// One SGD step per mini-batch, strictly in order.
    pub fn update_mini_batches(&mut self, batches: &[MiniBatch], n: usize, workers: &mut Workers) -> Result<()> {
        optimizers::check_sizes(n, 1)?;
        for (i, batch) in batches.iter().enumerate() {
            if batch.is_empty() {
                return Err(NNError::InvalidConfig(format!("mini-batch {} is empty", i)));
            }
            workers.run_mini_batch(self, batch)?;
            self.apply_update(workers, n, batch.len())?;
        }
        debug!("applied {} mini-batch updates", batches.len());
        Ok(())
    }

    /// Train with mini-batch SGD.
    ///
    /// Fails before the first step if the configuration is invalid, the
    /// training data is empty, or validation is requested without validation
    /// data. Any failure inside an epoch aborts training.
    pub fn fit(&mut self, training: &Dataset, validation: Option<&Dataset>, config: &TrainingConfig) -> Result<History> {
        config.validate()?;
        if training.is_empty() {
            return Err(NNError::EmptyDataset("Training".to_string()));
        }
        let validation = match (config.validate, validation) {
            (true, Some(v)) if !v.is_empty() => Some(v),
            (true, _) => return Err(NNError::EmptyDataset("Validation".to_string())),
            (false, _) => None,
        };
        if config.mini_batch_size > training.len() {
            return Err(NNError::InvalidConfig(format!(
                "mini-batch size {} exceeds the {} training samples",
                config.mini_batch_size,
                training.len()
            )));
        }
        for (x, y) in training.pairs().chain(validation.into_iter().flat_map(|v| v.pairs())) {
            self.check_sample(x, y)?;
        }

        self.hp = config.hyper_parameters()?;
        let mut workers = Workers::new(&self.sizes, config.n_cores)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut data = training.clone();
        let n = data.len();
        let mut history = History::default();

        for epoch in 0..config.epochs {
            if config.shuffle {
                data.shuffle(&mut rng);
            }
            let batches = data.mini_batches(config.mini_batch_size)?;
            self.update_mini_batches(&batches, n, &mut workers)?;

            let report = match validation {
                Some(v) => {
                    let report = EpochReport {
                        epoch,
                        hit_rate: Some(hit_rate(self, v)?),
                        cost: Some(self.total_cost(v)?),
                    };
                    info!(
                        "Epoch: {}/{} hit rate: {:.4} cost: {:.6}",
                        epoch + 1,
                        config.epochs,
                        report.hit_rate.unwrap_or_default(),
                        report.cost.unwrap_or_default()
                    );
                    report
                }
                None => {
                    info!("Epoch: {}/{} complete ({} mini-batches)", epoch + 1, config.epochs, batches.len());
                    EpochReport { epoch, hit_rate: None, cost: None }
                }
            };
            history.epochs.push(report);
        }
        Ok(history)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let encoded: Vec<u8> = bincode::serialize(self).map_err(NNError::SerializationError)?;

        File::create(path)
            .map_err(NNError::IoError)?
            .write_all(&encoded)
            .map_err(NNError::IoError)?;

        Ok(())
    }

    pub fn load(path: &str) -> Result<Network> {
        let mut buffer = Vec::new();

        File::open(path)
            .map_err(NNError::IoError)?
            .read_to_end(&mut buffer)
            .map_err(NNError::IoError)?;

        let network: Network = bincode::deserialize(&buffer).map_err(NNError::SerializationError)?;
        network.check_parameters()?;
        Ok(network)
    }

    /// Layer descriptors, cached sizes and parameter blocks must all agree.
    fn check_parameters(&self) -> Result<()> {
        let sizes = &self.sizes;
        if sizes.len() < 2 || self.layers.len() != sizes.len() || self.dense.len() + 1 != sizes.len() {
            return Err(NNError::LayerShapeMismatch(format!(
                "{} layers and {} parameter blocks for sizes {:?}",
                self.layers.len(),
                self.dense.len(),
                sizes
            )));
        }
        for (k, layer) in self.layers.iter().enumerate() {
            if layer.size != sizes[k] {
                return Err(NNError::LayerShapeMismatch(format!(
                    "layer {} has {} neurons, expected {}",
                    k, layer.size, sizes[k]
                )));
            }
        }
        for (k, d) in self.dense.iter().enumerate() {
            if d.inputs() != sizes[k] || d.outputs() != sizes[k + 1] || d.b.len() != sizes[k + 1] {
                return Err(NNError::LayerShapeMismatch(format!(
                    "parameter block {} has weights {:?} and {} biases, expected ({}, {})",
                    k,
                    d.w.dim(),
                    d.b.len(),
                    sizes[k],
                    sizes[k + 1]
                )));
            }
        }
        Ok(())
    }
}
