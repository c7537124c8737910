//! Logging shims.
//!
//! The `tracing` feature controls the scope stack's `trace!` lines
//! (`scope.enter`/`scope.exit`). With it, `trace!` is re-exported from
//! `tracing`; without it, a same-named no-op macro is exported from the
//! crate root so call sites compile unchanged:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::trace;
//! #[cfg(not(feature = "tracing"))]
//! use crate::trace;
//! ```

#[cfg(feature = "tracing")]
pub use tracing::trace;

/// Environment variable holding the `EnvFilter` directive for [`init_json`].
pub const LOG_ENV: &str = "CTXTREE_LOG";

/// Install a global JSON subscriber filtered by `CTXTREE_LOG` (default `info`).
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}
