use anyhow::{Context, Result};
use arrow::{compute::concat_batches, record_batch::RecordBatchReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;
use std::{
    env, fs,
    fs::File,
    path::{Path, PathBuf},
    time::Instant,
};
use tablewire::{default_uuid, MarshalConfig, Marshaller, TableInput};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tablewire=info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let config = match env::args().nth(1) {
        Some(path) => MarshalConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => MarshalConfig::default(),
    };
    let marshaller = Marshaller::new(config);

    // ─── 3) configure dirs ───────────────────────────────────────────
    let in_dir = PathBuf::from("parquet");
    let out_dir = PathBuf::from("envelopes");
    fs::create_dir_all(&out_dir)?;

    let pattern = in_dir.join("*.parquet");
    let mut inputs: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .collect();
    inputs.sort();
    if inputs.is_empty() {
        info!("no parquet files under {}; exit", in_dir.display());
        return Ok(());
    }
    info!("{} parquet files to marshal", inputs.len());

    // ─── 4) marshal in parallel ──────────────────────────────────────
    let start = Instant::now();
    let failures: usize = inputs
        .par_iter()
        .enumerate()
        .map(|(idx, path)| match marshal_file(&marshaller, idx, path, &out_dir) {
            Ok(bytes) => {
                info!(file = %path.display(), bytes, "wrote envelope");
                0
            }
            Err(e) => {
                error!(file = %path.display(), "marshal failed: {:#}", e);
                1
            }
        })
        .sum();

    info!(
        "done: {} ok, {} failed in {:?}",
        inputs.len() - failures,
        failures,
        start.elapsed()
    );
    Ok(())
}

/// Read one parquet file, marshal it and write `<out_dir>/<stem>.twev`.
fn marshal_file(marshaller: &Marshaller, idx: usize, path: &Path, out_dir: &Path) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    let uuid = default_uuid(&[idx as u32]);
    let envelope = marshaller.marshal(&TableInput::Columnar(batch), &uuid)?;
    let bytes = envelope.to_bytes();

    let stem = path
        .file_stem()
        .context("parquet path has no file stem")?
        .to_string_lossy();
    let out = out_dir.join(format!("{}.twev", stem));
    fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    Ok(bytes.len())
}
