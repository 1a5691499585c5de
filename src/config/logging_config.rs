use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default)]
    pub log_file_path: String,
}
