use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Error;
use tracing::{info, instrument, warn};

use crate::configuration::AssetSettings;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RelocationReport {
    /// Destination paths that were written
    pub copied: Vec<PathBuf>,
    /// Configured sources that were not present in the root
    pub missing: Vec<PathBuf>,
    /// Names of the `.png` files in the assets directory afterwards, sorted
    pub pngs: Vec<String>,
}

/// Copies each configured source into the assets directory under its target
/// name. Sources stay where they are; a missing source is reported, not fatal.
#[instrument(skip(settings))]
pub fn relocate_assets(root: &Path, settings: &AssetSettings) -> Result<RelocationReport, Error> {
    let assets_dir = root.join(&settings.directory);
    fs::create_dir_all(&assets_dir).map_err(|e| {
        Error::msg(format!(
            "Failed to create assets directory {}: {}",
            assets_dir.display(),
            e
        ))
    })?;

    let mut report = RelocationReport::default();

    for rename in &settings.renames {
        let source = root.join(&rename.source);

        if !source.is_file() {
            warn!(source = %source.display(), "asset not found");
            report.missing.push(rename.source.clone());
            continue;
        }

        let destination = assets_dir.join(&rename.target);
        fs::copy(&source, &destination).map_err(|e| {
            Error::msg(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                e
            ))
        })?;

        info!(source = %source.display(), destination = %destination.display(), "copied asset");
        report.copied.push(destination);
    }

    report.pngs = list_pngs(&assets_dir)?;

    Ok(report)
}

fn list_pngs(dir: &Path) -> Result<Vec<String>, Error> {
    let mut pngs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.ends_with(".png") {
            pngs.push(name);
        }
    }

    pngs.sort();
    Ok(pngs)
}
