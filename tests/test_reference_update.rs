// Two mini-batch updates of an all-ones 784-30-10 sigmoid network, checked
// against values computed independently in double precision.

use approx::assert_abs_diff_eq;
use sgdnet::prelude::*;

fn all_ones_network() -> Network {
    let layers = [
        Layer::new(784, Activation::Sigmoid).unwrap(),
        Layer::new(30, Activation::Sigmoid).unwrap(),
        Layer::new(10, Activation::Sigmoid).unwrap(),
    ];
    Network::with_init(
        &layers,
        Cost::CrossEntropy,
        HyperParameters::new(1.0, 5.0).unwrap(),
        Init::Constant(1.0),
        Init::Constant(1.0),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap()
}

// Input with a single lit pixel, target one-hot at `digit`.
fn sample(pixel: usize, digit: usize) -> (Array1<f64>, Array1<f64>) {
    let mut x = Array1::zeros(784);
    x[pixel] = 1.0;
    let mut y = Array1::zeros(10);
    y[digit] = 1.0;
    (x, y)
}

fn run(n_cores: usize) -> Network {
    let mut net = all_ones_network();
    let data: Vec<(Array1<f64>, Array1<f64>)> = vec![sample(1, 0), sample(2, 1), sample(3, 2), sample(4, 3)];
    let batches: Vec<MiniBatch> = data
        .chunks(2)
        .map(|chunk| chunk.iter().map(|(x, y)| (x, y)).collect())
        .collect();
    let mut workers = Workers::new(net.sizes(), n_cores).unwrap();
    net.update_mini_batches(&batches, 4, &mut workers).unwrap();
    net
}

fn check(net: &Network) {
    let eps = 1e-7;

    for &b in net.dense[0].b.iter() {
        assert_abs_diff_eq!(b, -0.22492310565942558, epsilon = eps);
    }
    let b1 = &net.dense[1].b;
    assert_abs_diff_eq!(b1[0], 0.499856603514518, epsilon = eps);
    assert_abs_diff_eq!(b1[1], 0.499856603514518, epsilon = eps);
    assert_abs_diff_eq!(b1[2], 0.4999997765049933, epsilon = eps);
    assert_abs_diff_eq!(b1[3], 0.4999997765049933, epsilon = eps);
    for j in 4..10 {
        assert_abs_diff_eq!(b1[j], -2.234950067469236e-07, epsilon = eps);
    }

    let w0 = &net.dense[0].w;
    for (i, row) in w0.outer_iter().enumerate() {
        let expected = match i {
            1 | 2 => 0.1806177835787835,
            3 | 4 => -0.0774904185145788,
            // decayed twice by 1 - eta·lambda/n = -0.25, never touched by a gradient
            _ => 0.0625,
        };
        for &w in row.iter() {
            assert_abs_diff_eq!(w, expected, epsilon = eps);
        }
    }

    let w1 = &net.dense[1].w;
    for row in w1.outer_iter() {
        assert_abs_diff_eq!(row[0], 0.17253490296477272, epsilon = eps);
        assert_abs_diff_eq!(row[1], 0.17253490296477272, epsilon = eps);
        assert_abs_diff_eq!(row[2], 0.5084082625849603, epsilon = eps);
        assert_abs_diff_eq!(row[3], 0.5084082625849603, epsilon = eps);
        for j in 4..10 {
            assert_abs_diff_eq!(row[j], 0.28269916860393346, epsilon = eps);
        }
    }
}

#[test]
fn single_worker_matches_reference_values() {
    check(&run(1));
}

#[test]
fn several_workers_match_reference_values() {
    check(&run(2));
    check(&run(3));
}
