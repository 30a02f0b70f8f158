use crate::prelude::*;

/// Cost function together with the output-error rule derived from it.
///
/// The delta rule of each variant is only a true cost derivative for some
/// output activations. `CrossEntropy` uses the closed form `a - y`, which is
/// exact when the output layer is sigmoid: the activation derivative cancels
/// against the cost derivative. Pairing it with any other output activation
/// still trains, but follows the wrong gradient. See [`Cost::pairs_with`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    CrossEntropy,
    Quadratic,
}

impl Cost {
    /// Output-layer error for one sample.
    pub fn delta(&self, z: &Array1<f64>, a: &Array1<f64>, y: &Array1<f64>, activation: Activation) -> Array1<f64> {
        let mut out = Array1::zeros(a.len());
        self.delta_into(z, a, y, activation, &mut out);
        out
    }

    pub fn delta_into(
        &self,
        z: &Array1<f64>,
        a: &Array1<f64>,
        y: &Array1<f64>,
        activation: Activation,
        out: &mut Array1<f64>,
    ) {
        Zip::from(&mut *out).and(a).and(y).for_each(|d, &a, &y| *d = a - y);
        if let Cost::Quadratic = self {
            *out *= &activation.prime(z);
        }
    }

    /// Cost contributed by a single sample.
    pub fn cost(&self, a: &Array1<f64>, y: &Array1<f64>) -> f64 {
        match self {
            Cost::CrossEntropy => cross_entropy(a, y),
            Cost::Quadratic => 0.5 * a.iter().zip(y).map(|(a, y)| (a - y).powi(2)).sum::<f64>(),
        }
    }

    /// Whether `delta` is the exact cost gradient for this output activation.
    pub fn pairs_with(&self, output: Activation) -> bool {
        match self {
            Cost::CrossEntropy => output == Activation::Sigmoid,
            Cost::Quadratic => true,
        }
    }
}

/// `Σ_j -y_j ln(a_j) - (1 - y_j) ln(1 - a_j)`.
///
/// An output that saturated to exactly 1.0 or exactly 0.0 puts `ln(0)` into
/// the sum; such outputs contribute nothing instead of turning the whole
/// cost into `NaN` or infinity.
pub fn cross_entropy(a: &Array1<f64>, y: &Array1<f64>) -> f64 {
    a.iter()
        .zip(y)
        .filter(|&(&a, _)| a != 1.0 && a != 0.0)
        .map(|(&a, &y)| -y * a.ln() - (1.0 - y) * (1.0 - a).ln())
        .sum()
}

/// `lambda / (2N) · Σ w²` over every weight matrix.
pub fn l2_penalty(weights: &[&Array2<f64>], lambda: f64, n: usize) -> f64 {
    let sum: f64 = weights.iter().map(|w| w.iter().map(|x| x * x).sum::<f64>()).sum();
    lambda / (2.0 * n as f64) * sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_entropy_delta_is_a_minus_y() {
        let z = array![0.3, -1.0];
        let a = array![0.8, 0.1];
        let y = array![1.0, 0.0];
        let d = Cost::CrossEntropy.delta(&z, &a, &y, Activation::Sigmoid);
        assert_abs_diff_eq!(d[0], -0.2, epsilon = 1e-15);
        assert_abs_diff_eq!(d[1], 0.1, epsilon = 1e-15);
    }

    #[test]
    fn quadratic_delta_scales_by_activation_prime() {
        let z = array![0.0];
        let a = array![0.5];
        let y = array![1.0];
        let d = Cost::Quadratic.delta(&z, &a, &y, Activation::Sigmoid);
        assert_abs_diff_eq!(d[0], -0.5 * 0.25, epsilon = 1e-15);
    }

    #[test]
    fn cross_entropy_matches_closed_form() {
        let a = array![0.25, 0.5];
        let y = array![1.0, 0.0];
        let expected = -(0.25f64).ln() - (0.5f64).ln();
        assert_abs_diff_eq!(Cost::CrossEntropy.cost(&a, &y), expected, epsilon = 1e-12);
    }

    #[test]
    fn saturated_outputs_do_not_poison_the_cost() {
        let y = array![1.0, 0.0, 0.0];
        let c = cross_entropy(&array![1.0, 0.0, 0.5], &y);
        assert!(c.is_finite());
        assert_abs_diff_eq!(c, -(0.5f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn only_sigmoid_outputs_pair_with_cross_entropy() {
        assert!(Cost::CrossEntropy.pairs_with(Activation::Sigmoid));
        assert!(!Cost::CrossEntropy.pairs_with(Activation::Relu));
        assert!(Cost::Quadratic.pairs_with(Activation::Tanh));
    }

    #[test]
    fn l2_penalty_sums_all_squared_weights() {
        let w0 = array![[1.0, 2.0]];
        let w1 = array![[3.0]];
        assert_abs_diff_eq!(l2_penalty(&[&w0, &w1], 2.0, 4), 2.0 / 8.0 * 14.0, epsilon = 1e-12);
    }
}
