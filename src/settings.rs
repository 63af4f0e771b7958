use config::{Config, Environment, File};
use serde_derive::Deserialize;

use crate::result::Result;

pub const DEFAULT_PORT: u16 = 6667;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub outbound_queue_len: usize,
    pub max_line_len: usize,
}

impl Settings {
    /// Defaults, then an optional `Settings` file, then `RELAY_*` environment variables.
    pub fn new() -> Result<Self> {
        let mut s = Settings::defaults()?;
        s.merge(File::with_name("Settings").required(false))?;
        s.merge(Environment::with_prefix("RELAY"))?;
        Ok(s.try_into()?)
    }

    fn defaults() -> Result<Config> {
        let mut s = Config::new();
        s.set_default("host", "0.0.0.0")?;
        s.set_default("port", DEFAULT_PORT as i64)?;
        s.set_default("outbound_queue_len", 256i64)?;
        s.set_default("max_line_len", 4096i64)?;
        Ok(s)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            outbound_queue_len: 256,
            max_line_len: 4096,
        }
    }
}
