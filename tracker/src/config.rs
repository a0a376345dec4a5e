//! Configuration loading
//!
//! Everything is environment-derived. An optional env file (`ENV_FILE`,
//! default `~/.jira.env`) is loaded first so collaborator credentials can
//! live outside the shell profile; values already present in the
//! environment win.

use std::path::PathBuf;

/// HTTP bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Load the optional env file.
///
/// Resolution order: explicit `ENV_FILE`, then `~/.jira.env`. A missing
/// file is not an error; a present-but-unreadable one is logged and
/// skipped. `dotenvy` never overrides variables already set.
pub fn load_env_file() {
    let path = match std::env::var("ENV_FILE") {
        Ok(path) => PathBuf::from(shellexpand::tilde(&path).into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde("~/.jira.env").into_owned()),
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No env file found");
        return;
    }

    match dotenvy::from_path(&path) {
        Ok(()) => tracing::info!(path = %path.display(), "Loaded env file"),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to load env file: {e}"),
    }
}

/// Whether workflow state transitions should be validated.
///
/// Off by default: the pipeline is intentionally permissive and any state
/// may follow any other. Set `WORKFLOW_ENFORCE_TRANSITIONS` to `1`/`true`
/// to restrict updates to the immediate successor or an earlier (rework)
/// state.
pub fn enforce_transitions() -> bool {
    std::env::var("WORKFLOW_ENFORCE_TRANSITIONS")
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v == "1" || v == "true" || v == "yes"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_is_localhost() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }
}
