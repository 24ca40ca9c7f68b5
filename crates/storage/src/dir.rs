use std::{fs, io, path::PathBuf};

use directories::BaseDirs;
use tempdir::TempDir;

/// Resolves and creates the directory the database lives in.
///
/// An explicit `data_dir` wins. Otherwise `ephemeral` selects a fresh temporary
/// directory, and the default is `<system data dir>/<app_name>`.
pub fn setup_data_dir(
    app_name: &str,
    data_dir: Option<PathBuf>,
    ephemeral: bool,
) -> io::Result<PathBuf> {
    let data_dir = match data_dir {
        Some(data_dir) => data_dir,
        None if ephemeral => TempDir::new(app_name)?.into_path(),
        None => BaseDirs::new()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Base directories not found"))?
            .data_dir()
            .join(app_name),
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir)
}
