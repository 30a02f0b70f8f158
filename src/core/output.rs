use csv::Writer;

use crate::prelude::*;

/// One row per epoch: `epoch,hit_rate,cost`. Epochs without validation
/// leave the last two columns empty.
pub fn write_history_to_csv(history: &History, file_path: &str) -> Result<()> {
    let mut wtr = Writer::from_path(file_path)?;
    wtr.write_record(["epoch", "hit_rate", "cost"])?;

    for report in &history.epochs {
        let field = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        wtr.write_record(&[
            (report.epoch + 1).to_string(),
            field(report.hit_rate),
            field(report.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
