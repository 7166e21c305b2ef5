use clap::builder::FalseyValueParser;
use clap::builder::NonEmptyStringValueParser;
use clap::builder::PossibleValuesParser;
use clap::ArgAction;
use clap::Parser;
use deconz_client::GatewayEndpoint;
use error_stack::Report;
use error_stack::ResultExt;
use utils::version;

use super::ConfigError;

/// Prometheus exporter for deCONZ sensors
#[derive(Parser, Debug, Clone)]
#[command(name = "deconz-exporter", about, long_about, version = &**version::VERSION)]
pub struct Cli {
    #[arg(
        long,
        env = "DECONZ_TOKEN",
        value_parser = NonEmptyStringValueParser::new(),
        help = "The API token for deconz"
    )]
    pub token: String,

    #[arg(
        long,
        env = "DECONZ_HOST",
        value_parser = NonEmptyStringValueParser::new(),
        help = "The host address of the deconz instance, e.g. localhost"
    )]
    pub host: String,

    #[arg(
        long,
        env = "DECONZ_PORT",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "The port on which deconz is available"
    )]
    pub port: u16,

    #[arg(
        long,
        env = "DECONZ_SCHEME",
        default_value = "http",
        value_parser = PossibleValuesParser::new(["http", "https"]),
        help = "URL scheme of the deconz REST API"
    )]
    pub scheme: String,

    #[arg(
        long,
        env = "DECONZ_VERBOSE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Verbose logging"
    )]
    pub verbose: bool,

    #[arg(
        long,
        env = "LISTEN_ADDR",
        default_value = "0.0.0.0:2112",
        help = "HTTP listen address for the metrics endpoint"
    )]
    pub listen_addr: String,
}

impl Cli {
    /// Gateway endpoint built from the parsed flags
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidGateway`] if token, host or port are unset
    pub fn endpoint(&self) -> Result<GatewayEndpoint, Report<ConfigError>> {
        let endpoint = GatewayEndpoint::new(self.host.clone(), self.port, self.token.clone())
            .change_context(ConfigError::InvalidGateway)?
            .with_scheme(self.scheme.clone());
        endpoint
            .sensors_url()
            .change_context(ConfigError::InvalidGateway)?;
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use similar_asserts::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("deconz-exporter").chain(args.iter().copied()))
    }

    #[test]
    fn parses_required_flags_with_defaults() {
        let cli = parse(&["--token", "ABCDEF", "--host", "192.168.0.222", "--port", "1702"])
            .expect("should parse");

        assert_eq!(cli.token, "ABCDEF");
        assert_eq!(cli.host, "192.168.0.222");
        assert_eq!(cli.port, 1702);
        assert_eq!(cli.scheme, "http");
        assert_eq!(cli.listen_addr, "0.0.0.0:2112");
    }

    #[test]
    fn verbose_and_listen_addr_can_be_set() {
        let cli = parse(&[
            "--token",
            "ABCDEF",
            "--host",
            "localhost",
            "--port",
            "80",
            "--verbose",
            "--listen-addr",
            "127.0.0.1:9100",
        ])
        .expect("should parse");

        assert!(cli.verbose);
        assert_eq!(cli.listen_addr, "127.0.0.1:9100");
    }

    #[test]
    fn verbose_env_accepts_truthy_and_falsey_words() {
        let args = ["--token", "ABCDEF", "--host", "localhost", "--port", "80"];
        let cases = [
            ("1", true),
            ("yes", true),
            ("true", true),
            ("on", true),
            ("0", false),
            ("no", false),
            ("false", false),
            ("off", false),
        ];

        for (value, expected) in cases {
            std::env::set_var("DECONZ_VERBOSE", value);
            let cli = parse(&args);
            std::env::remove_var("DECONZ_VERBOSE");

            let cli = cli.unwrap_or_else(|e| panic!("DECONZ_VERBOSE={value} rejected: {e}"));
            assert_eq!(cli.verbose, expected, "DECONZ_VERBOSE={value}");
        }
    }

    #[test]
    fn https_scheme_reaches_endpoint() {
        let cli = parse(&[
            "--token",
            "ABCDEF",
            "--host",
            "gateway.local",
            "--port",
            "8443",
            "--scheme",
            "https",
        ])
        .expect("should parse");

        let endpoint = cli.endpoint().expect("valid endpoint");

        assert_eq!(
            endpoint.sensors_url().expect("url").as_str(),
            "https://gateway.local:8443/api/ABCDEF/sensors"
        );
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let args = [
            "--token", "ABCDEF", "--host", "localhost", "--port", "80", "--scheme", "ftp",
        ];

        let err = parse(&args).expect_err("should be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_required_flags_are_rejected() {
        let cases: [&[&str]; 3] = [
            &["--host", "localhost", "--port", "80"],
            &["--token", "ABCDEF", "--port", "80"],
            &["--token", "ABCDEF", "--host", "localhost"],
        ];

        for args in cases {
            let err = parse(args).expect_err("should be rejected");
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument, "{args:?}");
        }
    }

    #[test]
    fn empty_and_zero_values_are_rejected() {
        let cases: [&[&str]; 3] = [
            &["--token", "", "--host", "localhost", "--port", "80"],
            &["--token", "ABCDEF", "--host", "", "--port", "80"],
            &["--token", "ABCDEF", "--host", "localhost", "--port", "0"],
        ];

        for args in cases {
            assert!(parse(args).is_err(), "{args:?} should be rejected");
        }
    }

    #[test]
    fn endpoint_uses_gateway_flags() {
        let cli = parse(&["--token", "ABCDEF", "--host", "192.168.0.222", "--port", "1702"])
            .expect("should parse");

        let endpoint = cli.endpoint().expect("valid endpoint");

        assert_eq!(
            endpoint.sensors_url().expect("url").as_str(),
            "http://192.168.0.222:1702/api/ABCDEF/sensors"
        );
    }

    #[test]
    fn endpoint_rejects_unusable_host() {
        let cli = Cli {
            token: "ABCDEF".to_string(),
            host: "not a host".to_string(),
            port: 80,
            scheme: "http".to_string(),
            verbose: false,
            listen_addr: "0.0.0.0:2112".to_string(),
        };

        let err = cli.endpoint().expect_err("should be rejected");
        assert!(matches!(err.current_context(), ConfigError::InvalidGateway));
    }
}
