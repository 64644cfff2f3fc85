//! Command-line and environment configuration for the server binary.

use std::time::Duration;

use clap::Parser;
use courier_core::SerializerRegistry;

use crate::network::NetworkConfig;

/// Courier demo server.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Parser)]
#[command(name = "courier-server", version, about)]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, env = "COURIER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on; 0 picks a free one.
    #[arg(long, env = "COURIER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds before a request is answered with 408.
    #[arg(long, env = "COURIER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Allowed CORS origin. Repeat for several; `*` allows any.
    #[arg(long = "cors-origin", value_name = "ORIGIN", default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Disable CORS handling entirely, ignoring `--cors-origin`.
    #[arg(long)]
    pub no_cors: bool,

    /// Send uncompressed bodies even when the client accepts gzip.
    #[arg(long)]
    pub no_compression: bool,

    /// Emit JSON log lines instead of human-readable ones.
    #[arg(long, env = "COURIER_LOG_JSON")]
    pub log_json: bool,

    /// Serve JSON only, ignoring `Accept: application/msgpack`.
    #[arg(long)]
    pub no_msgpack: bool,
}

impl ServerArgs {
    /// Serializer registry matching the selected formats.
    #[must_use]
    pub fn registry(&self) -> SerializerRegistry {
        if self.no_msgpack {
            SerializerRegistry::json_only()
        } else {
            SerializerRegistry::default()
        }
    }
}

impl From<&ServerArgs> for NetworkConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            cors_origins: if args.no_cors {
                Vec::new()
            } else {
                args.cors_origins.clone()
            },
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            compress_responses: !args.no_compression,
        }
    }
}
