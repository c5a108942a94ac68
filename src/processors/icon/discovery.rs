use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::processors::icon::structs::ImageExtension;

/// Creates the directory that will hold `output` (relative to `root`).
#[instrument]
pub fn ensure_assets_dir(root: &Path, output: &Path) -> io::Result<PathBuf> {
    let dir = match root.join(output).parent() {
        Some(parent) => parent.to_path_buf(),
        None => root.to_path_buf(),
    };

    if !dir.is_dir() {
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "created assets directory");
    }

    Ok(dir)
}

/// Picks the icon source from the files directly under `root`.
///
/// Ordering is deterministic: extension priority (png, jpg, jpeg, webp), then
/// file name. Hidden files and the output path itself are never picked.
#[instrument]
pub fn find_candidate_image(root: &Path, output: &Path) -> io::Result<Option<PathBuf>> {
    let output_path = root.join(output);
    let mut candidates: Vec<(usize, String, PathBuf)> = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_file() && !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let Some(extension) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageExtension::from_extension)
        else {
            continue;
        };

        if is_same_file(&path, &output_path) {
            debug!(path = %path.display(), "skipping output icon");
            continue;
        }

        debug!(%extension, name = %name, "candidate image");
        candidates.push((extension.priority(), name, path));
    }

    candidates.sort();
    debug!(count = candidates.len(), "collected candidate images");

    Ok(candidates.into_iter().next().map(|(_, _, path)| path))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"not really an image").unwrap();
    }

    fn default_output() -> PathBuf {
        PathBuf::from("assets/icon.png")
    }

    #[test]
    fn ensure_assets_dir_is_idempotent() {
        let root = tempfile::tempdir().unwrap();

        let first = ensure_assets_dir(root.path(), &default_output()).unwrap();
        let second = ensure_assets_dir(root.path(), &default_output()).unwrap();

        assert_eq!(first, root.path().join("assets"));
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn each_supported_extension_is_selected_on_its_own() {
        for name in ["logo.png", "logo.jpg", "logo.jpeg", "logo.webp", "LOGO.PNG", "logo.JpG"] {
            let root = tempfile::tempdir().unwrap();
            touch(root.path(), name);
            touch(root.path(), "notes.txt");

            let found = find_candidate_image(root.path(), &default_output()).unwrap();

            assert_eq!(found, Some(root.path().join(name)), "for {name}");
        }
    }

    #[test]
    fn no_candidate_returns_none() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "README.md");
        touch(root.path(), "logo.gif");
        touch(root.path(), "png");

        assert_eq!(find_candidate_image(root.path(), &default_output()).unwrap(), None);
    }

    #[test]
    fn extension_priority_then_name_order() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "a.webp");
        touch(root.path(), "b.jpeg");
        touch(root.path(), "c.jpg");
        touch(root.path(), "z.png");
        touch(root.path(), "m.png");

        let found = find_candidate_image(root.path(), &default_output()).unwrap();
        assert_eq!(found, Some(root.path().join("m.png")));

        fs::remove_file(root.path().join("m.png")).unwrap();
        fs::remove_file(root.path().join("z.png")).unwrap();
        let found = find_candidate_image(root.path(), &default_output()).unwrap();
        assert_eq!(found, Some(root.path().join("c.jpg")));
    }

    #[test]
    fn hidden_files_and_directories_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), ".hidden.png");
        fs::create_dir(root.path().join("folder.png")).unwrap();

        assert_eq!(find_candidate_image(root.path(), &default_output()).unwrap(), None);
    }

    #[test]
    fn output_path_is_never_selected() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "icon.png");

        let found = find_candidate_image(root.path(), Path::new("icon.png")).unwrap();
        assert_eq!(found, None);

        touch(root.path(), "source.jpg");
        let found = find_candidate_image(root.path(), Path::new("icon.png")).unwrap();
        assert_eq!(found, Some(root.path().join("source.jpg")));
    }

    #[test]
    fn images_inside_assets_are_not_scanned() {
        let root = tempfile::tempdir().unwrap();
        ensure_assets_dir(root.path(), &default_output()).unwrap();
        touch(&root.path().join("assets"), "icon.png");

        assert_eq!(find_candidate_image(root.path(), &default_output()).unwrap(), None);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");

        assert!(find_candidate_image(&missing, &default_output()).is_err());
    }
}
