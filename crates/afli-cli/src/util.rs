use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use afli_training::training_loop::TrainingConfig;
use anyhow::Context;
use serde::Serialize;

/// Writes `value` as pretty JSON to `path`, or to stdout without one.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a training configuration file. Missing fields take their defaults.
pub fn read_training_config(path: &Path) -> anyhow::Result<TrainingConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open training config: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse training config: {}", path.display()))
}
