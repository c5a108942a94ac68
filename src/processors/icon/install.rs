use std::path::Path;

use tracing::{info, instrument};

use crate::{
    configuration::IconSettings,
    errors::InstallError,
    processors::icon::{
        discovery::{ensure_assets_dir, find_candidate_image},
        manifest::update_manifest,
        resizer::{ImageResizer, resize_to_icon},
        structs::InstallReport,
    },
    utils::manifest_reference,
};

/// Finds a source image, renders the icon and patches the manifest.
///
/// Stops before touching anything when no candidate exists and before the
/// manifest when the resize fails. A manifest failure does not abort: the
/// icon is already in place and the error is carried in the report.
#[instrument(skip(settings, resizer))]
pub fn install_icon(
    root: &Path,
    settings: &IconSettings,
    resizer: &dyn ImageResizer,
) -> Result<InstallReport, InstallError> {
    let candidate = find_candidate_image(root, &settings.output)?.ok_or_else(|| {
        InstallError::NoCandidateFound {
            root: root.to_path_buf(),
        }
    })?;
    info!(candidate = %candidate.display(), "found source image");

    ensure_assets_dir(root, &settings.output)?;

    let icon = resize_to_icon(resizer, &candidate, &root.join(&settings.output), settings.size)
        .map_err(|source| InstallError::ImageProcessing {
            input: candidate.clone(),
            source,
        })?;

    let manifest = root.join(&settings.manifest);
    let manifest_result = update_manifest(
        &manifest,
        &manifest_reference(&settings.output),
        &settings.title,
    );

    if let Err(e) = &manifest_result {
        info!(error = %e, "icon written but manifest was not updated");
    }

    Ok(InstallReport {
        candidate,
        icon,
        manifest,
        manifest_result,
    })
}
