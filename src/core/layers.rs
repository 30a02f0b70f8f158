use crate::prelude::*;
use ndarray::linalg::general_mat_vec_mul;

/// One layer of neurons: how many there are and how they fire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub size: usize,
    pub activation: Activation,
}

impl Layer {
    pub fn new(size: usize, activation: Activation) -> Result<Self> {
        if size == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer size must be greater than 0".to_string()
            ));
        }
        Ok(Self { size, activation })
    }
}

/// How parameter entries are drawn when a network is built.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Init {
    StandardNormal,
    Uniform(f64, f64),
    Constant(f64),
}

impl Init {
    pub fn zeros() -> Self {
        Init::Constant(0.0)
    }

    pub fn array1<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Array1<f64> {
        match *self {
            Init::StandardNormal => Array1::random_using(len, StandardNormal, rng),
            Init::Uniform(lo, hi) => Array1::random_using(len, Uniform::new(lo, hi), rng),
            Init::Constant(c) => Array1::from_elem(len, c),
        }
    }

    pub fn array2<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
        match *self {
            Init::StandardNormal => Array2::random_using((rows, cols), StandardNormal, rng),
            Init::Uniform(lo, hi) => Array2::random_using((rows, cols), Uniform::new(lo, hi), rng),
            Init::Constant(c) => Array2::from_elem((rows, cols), c),
        }
    }
}

/// Column count of each row in a per-layer vector table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cols {
    Fixed(usize),
    PerLayer(Vec<usize>),
}

impl Cols {
    pub fn rows(&self, rows: usize) -> Result<Vec<usize>> {
        match self {
            Cols::Fixed(n) => Ok(vec![*n; rows]),
            Cols::PerLayer(sizes) if sizes.len() == rows => Ok(sizes.clone()),
            Cols::PerLayer(sizes) => Err(NNError::LayerShapeMismatch(format!(
                "{} row sizes given for a table of {} rows",
                sizes.len(),
                rows
            ))),
        }
    }
}

/// Builds `rows` vectors whose lengths are resolved from `cols`.
pub fn vector_table(rows: usize, cols: &Cols, init: Init, rng: &mut impl Rng) -> Result<Vec<Array1<f64>>> {
    Ok(cols
        .rows(rows)?
        .into_iter()
        .map(|n| init.array1(n, &mut *rng))
        .collect())
}

/// Parameters between layer `k` and layer `k + 1`.
///
/// `w` has shape `(sizes[k], sizes[k + 1])` so that `z = wᵀ·a + b`, and
/// `activation` is the activation of the receiving layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dense {
    pub w: Array2<f64>,
    pub b: Array1<f64>,
    pub activation: Activation,
}

impl Dense {
    pub fn new<R: Rng + ?Sized>(
        prev: usize,
        perceptron: usize,
        activation: Activation,
        weight_init: Init,
        bias_init: Init,
        rng: &mut R,
    ) -> Result<Self> {
        if perceptron == 0 || prev == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string()
            ));
        }
        Ok(Self {
            w: weight_init.array2(prev, perceptron, rng),
            b: bias_init.array1(perceptron, rng),
            activation,
        })
    }

    pub fn inputs(&self) -> usize {
        self.w.nrows()
    }

    pub fn outputs(&self) -> usize {
        self.w.ncols()
    }

    pub fn parameters(&self) -> usize {
        self.w.len() + self.b.len()
    }

    /// `z = wᵀ·a + b` into `z`, then `f(z)` into `a_next`.
    pub fn forward_into(&self, a: &Array1<f64>, z: &mut Array1<f64>, a_next: &mut Array1<f64>) {
        z.assign(&self.b);
        general_mat_vec_mul(1.0, &self.w.t(), a, 1.0, z);
        self.activation.forward_into(z, a_next);
    }

    pub fn typ(&self) -> String {
        "Dense".into()
    }
}
