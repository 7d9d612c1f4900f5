use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

/// The dashboard owns the terminal, so its logs go to a file.
pub fn init_file_logging(path: &Path) -> Result<()> {
  let file = OpenOptions::new().create(true).append(true).open(path)?;
  tracing_subscriber::fmt()
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!(e))?;
  Ok(())
}
