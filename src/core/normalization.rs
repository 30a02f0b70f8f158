use ndarray::{ArrayBase, DataMut, Dimension};

/// Affine rescaling between `[lb, ub]` and `[0, 1]`.
pub trait Normalization {
    fn to_unity(&mut self, lb: f64, ub: f64);
    fn from_unity(&mut self, lb: f64, ub: f64);
}

impl<S, D> Normalization for ArrayBase<S, D>
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    fn to_unity(&mut self, lb: f64, ub: f64) {
        let range = ub - lb;

        // If the range is zero or nearly zero, all values become 0.0
        if range.abs() < f64::EPSILON {
            self.fill(0.0);
        } else {
            self.mapv_inplace(|v| (v - lb) / range);
        }
    }

    fn from_unity(&mut self, lb: f64, ub: f64) {
        let range = ub - lb;

        // If the range is zero or nearly zero, all values become lb
        if range.abs() < f64::EPSILON {
            self.fill(lb);
        } else {
            self.mapv_inplace(|v| v * range + lb);
        }
    }
}
