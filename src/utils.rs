use std::path::{Component, Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` wins; otherwise each `-d` raises
/// the level one step from `warn`. The returned guard flushes on drop.
pub fn init_tracing(debug: u8) -> WorkerGuard {
    let default_level = match debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("extpack={default_level}")));

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .init();

    guard
}

/// Renders a root-relative path the way manifests reference files: `/`
/// separators, no leading `./`.
pub fn manifest_reference(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
