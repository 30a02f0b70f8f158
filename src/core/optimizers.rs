use crate::prelude::*;

/// Learning rate `eta` and L2 regularization strength `lambda`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HyperParameters {
    pub eta: f64,
    pub lambda: f64,
}

impl HyperParameters {
    pub fn new(eta: f64, lambda: f64) -> Result<Self> {
        let hp = Self { eta, lambda };
        hp.validate()?;
        Ok(hp)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(NNError::InvalidConfig(format!("eta must be positive, got {}", self.eta)));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(NNError::InvalidConfig(format!(
                "lambda must be non-negative, got {}",
                self.lambda
            )));
        }
        Ok(())
    }

    /// Factor `1 - eta·lambda/n` every weight is multiplied by per update.
    pub fn weight_decay(&self, n: usize) -> f64 {
        1.0 - self.eta * self.lambda / n as f64
    }
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self { eta: 0.5, lambda: 5.0 }
    }
}

/// L2-regularized SGD step for one layer boundary.
///
/// `w = (1 - eta·lambda/n)·w - (eta/m)·nabla_w` and `b = b - (eta/m)·nabla_b`,
/// where `n` is the training set size and `m` the mini-batch size. Both must
/// be non-zero; the parameters are left untouched otherwise.
pub fn apply_update(
    dense: &mut Dense,
    nabla_w: &Array2<f64>,
    nabla_b: &Array1<f64>,
    hp: &HyperParameters,
    n: usize,
    m: usize,
) -> Result<()> {
    check_sizes(n, m)?;
    let decay = hp.weight_decay(n);
    let step = hp.eta / m as f64;

    Zip::from(&mut dense.w)
        .and(nabla_w)
        .for_each(|w, &nw| *w = decay * *w - step * nw);
    dense.b.scaled_add(-step, nabla_b);
    Ok(())
}

/// Training set size `n` and mini-batch size `m` both divide in the update rule.
pub fn check_sizes(n: usize, m: usize) -> Result<()> {
    if n == 0 {
        return Err(NNError::InvalidConfig("training set size must be at least 1".to_string()));
    }
    if m == 0 {
        return Err(NNError::InvalidConfig("mini-batch size must be at least 1".to_string()));
    }
    Ok(())
}
