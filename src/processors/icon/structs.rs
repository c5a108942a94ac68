use std::{fmt, path::PathBuf};

use strum::{EnumIter, IntoEnumIterator};

use crate::errors::ManifestError;

/// Image extensions accepted as icon sources, in selection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ImageExtension {
    pub fn as_str(&self) -> &str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
            ImageExtension::Webp => "webp",
        }
    }

    /// Case-insensitive lookup of a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        ImageExtension::iter().find(|candidate| candidate.as_str().eq_ignore_ascii_case(extension))
    }

    /// Position in the allow-list; lower wins.
    pub fn priority(&self) -> usize {
        ImageExtension::iter()
            .position(|candidate| candidate == *self)
            .unwrap_or(usize::MAX)
    }
}

/// Outcome of an icon run that got as far as writing the icon.
#[derive(Debug)]
pub struct InstallReport {
    pub candidate: PathBuf,
    pub icon: PathBuf,
    pub manifest: PathBuf,
    /// The manifest step never aborts the run; its failure is carried here.
    pub manifest_result: Result<(), ManifestError>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.manifest_result.is_ok()
    }
}
