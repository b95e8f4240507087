use serde::{Deserialize, Serialize};

/// Persisted configuration from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub todo: TodoSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoSection {
    /// Path to the todo file. A leading `~/` expands to the home directory.
    #[serde(default)]
    pub file: Option<String>,
}
