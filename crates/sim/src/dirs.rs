//! Platform-specific directories for simulation output.

use std::path::PathBuf;

/// Get the platform-specific log directory.
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/agent-sim/logs`
/// - Linux: `~/.cache/agent-sim/logs` (or `$XDG_CACHE_HOME/agent-sim/logs`)
/// - Windows: `%LOCALAPPDATA%\agent-sim\logs`
/// - Fallback: `/tmp/agent-sim/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent-sim")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/agent-sim"))
        .join("logs")
}
