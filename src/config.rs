use serde::Deserialize;

pub const DEFAULT_STORAGE_KEY: &str = "blackjackStats";

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Fixes the shuffle order. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            seed: None,
            storage_key: default_storage_key(),
        }
    }
}
