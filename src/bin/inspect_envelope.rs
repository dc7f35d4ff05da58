use anyhow::{Context, Result};
use std::{env, fs, path::Path, process::exit};
use tablewire::{encode, envelope::flags, Envelope};

fn main() {
    // Expect exactly one CLI argument: path to an envelope file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <ENVELOPE_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_envelope(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Decode the envelope and print header, schema and style details.
fn inspect_envelope(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let env = Envelope::from_bytes(&bytes)?;
    let f = env.flags();

    println!("=== Envelope: {} ===", path.display());
    println!("Size on disk:         {} bytes", bytes.len());
    println!(
        "Flags:                {:#010b} (styled={} append={} caption={} columns={})",
        f,
        f & flags::STYLED != 0,
        f & flags::APPEND != 0,
        f & flags::CAPTION != 0,
        f & flags::COLUMNS != 0
    );
    if let Some(info) = env.append_info() {
        println!("Prior rows:           {}", info.prior_row_count);
    }
    println!("Rows in payload:      {}", env.row_count()?);
    println!("Rows after applying:  {}", env.total_rows()?);
    println!("Table bytes:          {}", env.table().len());
    println!();

    println!("=== Columns ===");
    for col in encode::read_schema(env.table())? {
        println!("- {:<30} | {}", col.name, col.kind);
    }
    println!();

    if let Some(style) = env.style() {
        println!("=== Style ===");
        println!("UUID:                 {}", style.uuid);
        println!(
            "Caption:              {}",
            style.caption.as_deref().unwrap_or("<none>")
        );
        println!("Display value bytes:  {}", style.display_values.len());
        if style.styles.is_empty() {
            println!("Rules:                <none>");
        } else {
            println!("Rules:");
            for rule in style.styles.lines() {
                println!("  {}", rule);
            }
        }
        println!();
    }

    if let Some(columns) = env.column_config() {
        println!("=== Column config ===");
        let pretty: serde_json::Value = serde_json::from_str(columns)?;
        println!("{}", serde_json::to_string_pretty(&pretty)?);
    }

    Ok(())
}
