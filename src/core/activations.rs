#[allow(unused)]
use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn forward(&self, z: &Array1<f64>) -> Array1<f64> {
        let mut a = Array1::zeros(z.len());
        self.forward_into(z, &mut a);
        a
    }

    /// Writes `f(z)` into `out`, reusing its storage.
    pub fn forward_into(&self, z: &Array1<f64>, out: &mut Array1<f64>) {
        let f = match self {
            Self::Linear => linear_forward,
            Self::Relu => relu_forward,
            Self::Sigmoid => sigmoid_forward,
            Self::Tanh => tanh_forward,
        };
        Zip::from(out).and(z).for_each(|a, &z| *a = f(z));
    }

    /// Elementwise derivative `f'(z)`.
    pub fn prime(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Linear => Array1::ones(z.len()),
            Self::Relu => z.mapv(relu_backward),
            Self::Sigmoid => z.mapv(sigmoid_backward),
            Self::Tanh => z.mapv(tanh_backward),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
        }
    }
}

fn linear_forward(z: f64) -> f64 {
    z
}

pub(crate) fn sigmoid_forward(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn sigmoid_backward(z: f64) -> f64 {
    let s = sigmoid_forward(z);
    s * (1.0 - s)
}

fn relu_forward(z: f64) -> f64 {
    if z >= 0.0 { z } else { 0.0 }
}

fn relu_backward(z: f64) -> f64 {
    if z >= 0.0 { 1.0 } else { 0.0 }
}

fn tanh_forward(z: f64) -> f64 {
    z.tanh()
}

fn tanh_backward(z: f64) -> f64 {
    let t = z.tanh();
    1.0 - t * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_of_zero_is_one_half() {
        let a = Activation::Sigmoid.forward(&Array1::zeros(4));
        assert!(a.iter().all(|&v| v == 0.5));
        let p = Activation::Sigmoid.prime(&Array1::zeros(4));
        assert!(p.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn relu_clamps_negatives_and_keeps_unit_slope_at_zero() {
        let z = array![-2.0, 0.0, 3.5];
        assert_eq!(Activation::Relu.forward(&z), array![0.0, 0.0, 3.5]);
        assert_eq!(Activation::Relu.prime(&z), array![0.0, 1.0, 1.0]);
    }

    #[test]
    fn tanh_prime_matches_finite_difference() {
        let z = array![-1.3, 0.2, 0.9];
        let h = 1e-6;
        let numeric = (Activation::Tanh.forward(&(&z + h)) - Activation::Tanh.forward(&(&z - h))) / (2.0 * h);
        let analytic = Activation::Tanh.prime(&z);
        for (n, a) in numeric.iter().zip(analytic.iter()) {
            assert_abs_diff_eq!(n, a, epsilon = 1e-8);
        }
    }

    #[test]
    fn forward_into_overwrites_previous_contents() {
        let mut out = Array1::from_elem(3, 42.0);
        Activation::Linear.forward_into(&array![1.0, 2.0, 3.0], &mut out);
        assert_eq!(out, array![1.0, 2.0, 3.0]);
    }
}
