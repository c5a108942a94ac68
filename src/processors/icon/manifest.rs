use std::{fs, path::Path};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::errors::ManifestError;

fn read_manifest(path: &Path) -> Result<(Value, bool), ManifestError> {
    let manifest_data = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest: Value =
        serde_json::from_str(&manifest_data).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !manifest.is_object() {
        return Err(ManifestError::Parse {
            path: path.to_path_buf(),
            reason: "top-level value is not a JSON object".to_string(),
        });
    }

    Ok((manifest, manifest_data.ends_with('\n')))
}

fn write_manifest(
    path: &Path,
    manifest: &Value,
    trailing_newline: bool,
) -> Result<(), ManifestError> {
    let mut new_manifest =
        serde_json::to_string_pretty(manifest).map_err(|e| ManifestError::Write {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

    if trailing_newline {
        new_manifest.push('\n');
    }

    fs::write(path, new_manifest).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Points the manifest's `icon` and every activity bar container at
/// `icon_ref`, and retitles the containers. Returns how many containers were
/// touched.
pub fn apply_icon(manifest: &mut Value, icon_ref: &str, title: &str) -> usize {
    let Some(root) = manifest.as_object_mut() else {
        return 0;
    };

    root.insert("icon".to_string(), Value::String(icon_ref.to_string()));

    let Some(containers) = root
        .get_mut("contributes")
        .and_then(|c| c.get_mut("viewsContainers"))
        .and_then(|v| v.get_mut("activitybar"))
        .and_then(Value::as_array_mut)
    else {
        return 0;
    };

    let mut updated = 0;
    for (index, container) in containers.iter_mut().enumerate() {
        let Some(container) = container.as_object_mut() else {
            warn!(index, "activitybar entry is not an object; leaving it alone");
            continue;
        };

        container.insert("icon".to_string(), Value::String(icon_ref.to_string()));
        container.insert("title".to_string(), Value::String(title.to_string()));
        updated += 1;
    }

    updated
}

/// Rewrites the manifest in place. Nothing is written unless the file parsed.
#[instrument]
pub fn update_manifest(
    manifest_path: &Path,
    icon_ref: &str,
    title: &str,
) -> Result<(), ManifestError> {
    let (mut manifest, trailing_newline) = read_manifest(manifest_path)?;

    let containers = apply_icon(&mut manifest, icon_ref, title);
    debug!(containers, "patched activitybar containers");

    write_manifest(manifest_path, &manifest, trailing_newline)?;
    info!(path = %manifest_path.display(), icon = icon_ref, "manifest updated");

    Ok(())
}
