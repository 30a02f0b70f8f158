use log::info;
use sgdnet::config::load_config;
use sgdnet::core::write_history_to_csv;
use sgdnet::data::one_hot;
use sgdnet::plot::plot_cost_over_epochs;
use sgdnet::prelude::*;

/// XOR truth table, repeated `copies` times, with one-hot targets.
fn xor(copies: usize) -> Result<Dataset> {
    let table = [([0.0, 0.0], 0), ([0.0, 1.0], 1), ([1.0, 0.0], 1), ([1.0, 1.0], 0)];
    let mut inputs = vec![];
    let mut outputs = vec![];
    for _ in 0..copies {
        for (x, label) in table.iter() {
            inputs.push(arr1(x));
            outputs.push(one_hot(*label, 2)?);
        }
    }
    Dataset::new(inputs, outputs)
}

fn main() -> Result<()> {
    env_logger::init();

    // Optional JSON config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => TrainingConfig {
            epochs: 300,
            mini_batch_size: 4,
            eta: 0.5,
            lambda: 0.0,
            seed: Some(42),
            ..TrainingConfig::default()
        },
    };
    info!("training with {:?}", config);

    let layers = [
        Layer::new(2, Activation::Sigmoid)?,
        Layer::new(6, Activation::Sigmoid)?,
        Layer::new(2, Activation::Sigmoid)?,
    ];
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
    let mut model = Network::with_init(
        &layers,
        Cost::CrossEntropy,
        config.hyper_parameters()?,
        Init::StandardNormal,
        Init::StandardNormal,
        &mut rng,
    )?;
    println!("{}", model.summary());

    let training = xor(25)?;
    let validation = xor(1)?;
    let history = model.fit(&training, Some(&validation), &config)?;

    for (x, y) in validation.pairs() {
        println!("{} -> {:.3} (target {})", x, model.predict(x)?, y);
    }

    write_history_to_csv(&history, "xor_history.csv")?;
    if let Err(e) = plot_cost_over_epochs::plot_cost_over_epochs(&history.costs(), "xor_cost.png") {
        log::warn!("could not draw cost plot: {}", e);
    }
    model.save("./xor.model")?;

    Ok(())
}
