use clap::{Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process configuration. Every flag can also be supplied through its env var.
#[derive(Debug, Clone, Parser)]
#[command(name = "intramail-api", version, about = "Internal email RPC server")]
pub struct Config {
    #[arg(long, env = "SERVER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(long, env = "SERVER_PORT", default_value_t = 2022)]
    pub port: u16,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            Config::try_parse_from(["intramail-api", "--database-url", "postgres://localhost/mail"])
                .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/mail");
        assert_eq!(config.port, 2022);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:2022");
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "intramail-api",
            "--database-url",
            "postgres://db/mail",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--max-connections",
            "12",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_invalid_port() {
        let result = Config::try_parse_from([
            "intramail-api",
            "--database-url",
            "postgres://db/mail",
            "--port",
            "70000",
        ]);
        assert!(result.is_err());
    }
}
