use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub fn output_json<T: Serialize + ?Sized>(value: &T, output_file: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(path) = output_file {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
    } else {
        println!("{json}");
    }
    Ok(())
}
