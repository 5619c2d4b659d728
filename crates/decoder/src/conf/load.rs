//! Load — config loading from file and environment variables.

use std::path::Path;
use std::fs::File;
use std::io::Read;

use super::model::{DecoderConfig, JsonConfig};

const DEFAULT_CONFIG_PATH: &str = "/etc/decoder/decoder.toml";

impl DecoderConfig {
    /// Load configuration from file or defaults, then apply environment overrides
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("DECODER_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: DecoderConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// Any `DECODER_JSON_*` variable turns JSON decoding on.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(max) = lookup("DECODER_MAX_BYTES") {
            self.max_bytes = max
                .parse()
                .map_err(|_| format!("DECODER_MAX_BYTES is not a number: {}", max))?;
        }

        if let Some(key) = lookup("DECODER_JSON_MESSAGE_KEY") {
            self.json_mut().message_key = key;
        }

        if let Some(flag) = parse_flag(&lookup, "DECODER_JSON_KEYS_UNDER_ROOT")? {
            self.json_mut().keys_under_root = flag;
        }
        if let Some(flag) = parse_flag(&lookup, "DECODER_JSON_OVERWRITE_KEYS")? {
            self.json_mut().overwrite_keys = flag;
        }
        if let Some(flag) = parse_flag(&lookup, "DECODER_JSON_ADD_ERROR_KEY")? {
            self.json_mut().add_error_key = flag;
        }
        if let Some(flag) = parse_flag(&lookup, "DECODER_JSON_IGNORE_DECODING_ERROR")? {
            self.json_mut().ignore_decoding_error = flag;
        }

        Ok(())
    }

    fn json_mut(&mut self) -> &mut JsonConfig {
        self.json.get_or_insert_with(JsonConfig::default)
    }
}

fn parse_flag<F>(lookup: &F, var: &str) -> Result<Option<bool>, String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .parse()
                .map_err(|_| format!("{} must be true or false, got: {}", var, value))
        })
        .transpose()
}
