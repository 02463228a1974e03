use std::path::PathBuf;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use ocifleet::config::LoggingConfig;

/// Starts the global logger.
///
/// Logs go to stderr unless `logging.path` names a file, in which case that
/// file is rotated by size. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(config: &LoggingConfig, level: Option<&str>) -> anyhow::Result<LoggerHandle> {
    let level = level.unwrap_or(&config.level);
    let logger = Logger::try_with_env_or_str(level)?;
    let Some(path) = config.path.as_ref().map(PathBuf::from) else {
        return Ok(logger.log_to_stderr().start()?);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let basename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ocifleet")
        .to_string();
    let handle = logger
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    Ok(handle)
}
