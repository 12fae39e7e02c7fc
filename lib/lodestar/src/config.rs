use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PORT: u16 = 9000;

#[derive(Serialize, Deserialize)]
pub struct Server {
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: Server,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            server: Server {
                address: Some(format!("localhost:{}", DEFAULT_PORT)),
            },
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ServerConfig {
        serdeconv::from_toml_file(path).expect("Error loading server configuration file")
    }

    /// Listen address with the default applied.
    pub fn address(&self) -> String {
        match &self.server.address {
            Some(address) => address.clone(),
            None => format!("localhost:{}", DEFAULT_PORT),
        }
    }
}
