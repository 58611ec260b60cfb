//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are recorded only while `puffin::set_scopes_on(true)` is active, so the
//! macros cost almost nothing in normal runs.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

#[cfg(feature = "profiling-server")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable scope collection and serve it to `puffin_viewer` on `addr`.
///
/// ```no_run
/// formcraft_core::profiling::init_profiling("127.0.0.1:8585");
/// ```
#[cfg(feature = "profiling-server")]
pub fn init_profiling(addr: &str) {
    puffin::set_scopes_on(true);

    match puffin_http::Server::new(addr) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", addr);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

/// Enable or disable scope collection without starting a server.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Mark a frame boundary; one frame per handled pointer event.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
