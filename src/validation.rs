use crate::prelude::*;

/// Index of the largest entry; on ties the earliest index wins.
pub fn arg_max(v: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Fraction of samples whose predicted class matches the target's.
pub fn hit_rate(network: &Network, data: &Dataset) -> Result<f64> {
    if data.is_empty() {
        return Err(NNError::EmptyDataset("Validation".to_string()));
    }
    let mut hits = 0;
    for (x, y) in data.pairs() {
        network.check_sample(x, y)?;
        if arg_max(&network.predict(x)?) == arg_max(y) {
            hits += 1;
        }
    }
    Ok(hits as f64 / data.len() as f64)
}
