use anyhow::{Context, bail};
use clap::Parser;
use core::time::Duration;
use tonic::transport::Uri;

/// Runtime configuration for the `shiiip-consignment-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for running next to
/// a local vessel service.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shiiip-consignment-server",
    version,
    about = "A gRPC service that registers consignments and assigns them to vessels"
)]
pub struct CliArgs {
    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:50051" or "/tmp/shiiip-consignment.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,

    /// URI of the vessel service used to allocate vessels.
    ///
    /// The connection is established lazily on the first lookup, so the
    /// consignment service starts even while the vessel service is down.
    ///
    /// Environment variable: `VESSEL_ADDR`
    #[arg(long, env = "VESSEL_ADDR", default_value_t = String::from("http://127.0.0.1:50052"))]
    pub vessel_addr: String,

    /// Deadline for a single `FindAvailable` call, in milliseconds.
    ///
    /// A lookup that exceeds it fails the creation request and nothing is
    /// stored.
    ///
    /// Environment variable: `VESSEL_TIMEOUT_MS`
    #[arg(long, env = "VESSEL_TIMEOUT_MS", default_value_t = 5_000)]
    pub vessel_timeout_ms: u64,

    /// Timeout for establishing the connection to the vessel service, in
    /// milliseconds.
    ///
    /// Environment variable: `VESSEL_CONNECT_TIMEOUT_MS`
    #[arg(long, env = "VESSEL_CONNECT_TIMEOUT_MS", default_value_t = 1_000)]
    pub vessel_connect_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
    pub vessel_addr: Uri,
    pub vessel_timeout: Duration,
    pub vessel_connect_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.vessel_timeout_ms == 0 {
            bail!("VESSEL_TIMEOUT_MS must be greater than 0");
        }

        if args.vessel_connect_timeout_ms == 0 {
            bail!("VESSEL_CONNECT_TIMEOUT_MS must be greater than 0");
        }

        let vessel_addr: Uri = args
            .vessel_addr
            .parse()
            .with_context(|| format!("VESSEL_ADDR ({}) is not a valid URI", args.vessel_addr))?;

        match vessel_addr.scheme_str() {
            Some("http" | "https") => {}
            _ => bail!(
                "VESSEL_ADDR ({}) must use the http or https scheme",
                args.vessel_addr
            ),
        }

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
            vessel_addr,
            vessel_timeout: Duration::from_millis(args.vessel_timeout_ms),
            vessel_connect_timeout: Duration::from_millis(args.vessel_connect_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every env-backed flag, passed explicitly so variables set in the
    /// process environment never leak into a test.
    const BASE_ARGS: &[(&str, &str)] = &[
        ("--server-addr", "127.0.0.1:50051"),
        ("--vessel-addr", "http://127.0.0.1:50052"),
        ("--vessel-timeout-ms", "5000"),
        ("--vessel-connect-timeout-ms", "1000"),
    ];

    fn parse(overrides: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let mut argv = vec!["shiiip-consignment-server"];
        for (flag, default) in BASE_ARGS {
            let value = overrides
                .iter()
                .find(|(name, _)| name == flag)
                .map_or(*default, |(_, value)| *value);
            argv.extend([*flag, value]);
        }
        ServerConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn explicit_flags_are_applied() {
        let config = parse(&[
            ("--server-addr", "127.0.0.1:6000"),
            ("--vessel-addr", "https://vessels.internal:443"),
            ("--vessel-timeout-ms", "250"),
            ("--vessel-connect-timeout-ms", "50"),
        ])
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:6000");
        assert!(!config.uds);
        assert_eq!(config.vessel_addr.host(), Some("vessels.internal"));
        assert_eq!(config.vessel_timeout, Duration::from_millis(250));
        assert_eq!(config.vessel_connect_timeout, Duration::from_millis(50));
    }

    #[test]
    fn base_flags_are_valid() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.vessel_timeout, Duration::from_secs(5));
        assert_eq!(config.vessel_connect_timeout, Duration::from_secs(1));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let err = parse(&[("--vessel-timeout-ms", "0")]).unwrap_err();
        assert!(err.to_string().contains("VESSEL_TIMEOUT_MS"));

        let err = parse(&[("--vessel-connect-timeout-ms", "0")]).unwrap_err();
        assert!(err.to_string().contains("VESSEL_CONNECT_TIMEOUT_MS"));
    }

    #[test]
    fn vessel_addr_needs_http_scheme() {
        let err = parse(&[("--vessel-addr", "127.0.0.1:50052")]).unwrap_err();
        assert!(err.to_string().contains("VESSEL_ADDR"));

        let err = parse(&[("--vessel-addr", "ftp://vessels:21")]).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }
}
