use std::{
    fs,
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use image::{ImageFormat, imageops::FilterType};
use tracing::{debug, info, instrument, warn};

use crate::{
    configuration::{IconSettings, ResizerKind},
    errors::ResizeError,
};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Scales an image to an exact size. Aspect ratio is not preserved.
pub trait ImageResizer {
    fn resize(&self, input: &Path, output: &Path, width: u32, height: u32)
    -> Result<(), ResizeError>;
}

impl<T: ImageResizer + ?Sized> ImageResizer for Box<T> {
    fn resize(
        &self,
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        (**self).resize(input, output, width, height)
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegResizer {
    pub program: String,
    pub timeout: Duration,
}

impl ImageResizer for FfmpegResizer {
    #[instrument(skip(self), fields(program = %self.program))]
    fn resize(
        &self,
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        let mut stderr_log = tempfile::tempfile()?;

        let mut child = Command::new(&self.program)
            .arg("-y")
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(format!("scale={}:{}", width, height))
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr_log.try_clone()?)
            .spawn()
            .map_err(|source| ResizeError::ToolUnavailable {
                program: self.program.clone(),
                source,
            })?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!(timeout = ?self.timeout, "image tool timed out; killing it");
                child.kill().ok();
                child.wait().ok();
                return Err(ResizeError::TimedOut {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        debug!(%status, elapsed = ?started.elapsed(), "image tool finished");

        if !status.success() {
            let mut stderr = String::new();
            stderr_log.seek(SeekFrom::Start(0))?;
            stderr_log.read_to_string(&mut stderr).ok();

            return Err(ResizeError::ToolFailed {
                program: self.program.clone(),
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeResizer;

impl ImageResizer for NativeResizer {
    #[instrument(skip(self))]
    fn resize(
        &self,
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        let source = image::open(input)?;
        debug!(
            source_width = source.width(),
            source_height = source.height(),
            "decoded source image"
        );

        source
            .resize_exact(width, height, FilterType::Lanczos3)
            .save_with_format(output, ImageFormat::Png)?;

        Ok(())
    }
}

pub fn resizer_for(settings: &IconSettings) -> Box<dyn ImageResizer> {
    match settings.resizer {
        ResizerKind::Ffmpeg => Box::new(FfmpegResizer {
            program: settings.ffmpeg.clone(),
            timeout: settings.timeout(),
        }),
        ResizerKind::Native => Box::new(NativeResizer),
    }
}

/// Temp files are created 0600; the icon keeps the mode of the file it
/// replaces, or 0644 when there is none.
#[cfg(unix)]
fn icon_permissions(output: &Path) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(output)
        .map(|metadata| metadata.permissions())
        .unwrap_or_else(|_| fs::Permissions::from_mode(0o644))
}

/// Renders `candidate` into a temp file beside `output` and renames it into
/// place, so a failed resize never leaves a half-written icon behind.
#[instrument(skip(resizer))]
pub fn resize_to_icon(
    resizer: &dyn ImageResizer,
    candidate: &Path,
    output: &Path,
    size: u32,
) -> Result<PathBuf, ResizeError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staging = tempfile::Builder::new()
        .prefix(".icon-")
        .suffix(".png")
        .tempfile_in(dir)?;

    resizer.resize(candidate, staging.path(), size, size)?;

    if fs::metadata(staging.path())?.len() == 0 {
        return Err(ResizeError::Io(std::io::Error::other(
            "image tool produced an empty file",
        )));
    }

    #[cfg(unix)]
    fs::set_permissions(staging.path(), icon_permissions(output))?;

    staging.persist(output).map_err(|e| ResizeError::Io(e.error))?;
    info!(output = %output.display(), size, "icon written");

    Ok(output.to_path_buf())
}
