use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging at `info`, or at `debug` when `debug` is set.
///
/// With `debug` the level can be overridden via the `RUST_LOG` environment
/// variable. When `log_file` is given, output is also appended to that file.
/// Calling this again after a subscriber is installed has no effect.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // user's environment cannot make the launcher verbose.
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let file = log_file.and_then(|path| {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
        let name = path.file_name()?;
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("cannot create log directory {}: {e}", dir.display());
            return None;
        }
        Some(tracing_appender::rolling::never(dir, name))
    });

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(writer))
                .try_init()
                .is_ok();
            if installed {
                let _ = FILE_GUARD.set(guard);
            }
        }
        None => {
            let _ = builder.try_init();
        }
    }
}
