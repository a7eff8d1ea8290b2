use crate::units::ByteBase;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which payload shape the response batch carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResponseKind {
    /// Any JSON payload, shown as compact JSON
    Generic,
    /// Storage scan results
    Scan,
    /// Storage format results
    Format,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hostlist-report")]
#[command(about = "Summarize per-host responses from a storage fleet, grouping hosts with identical results")]
#[command(version)]
pub struct CliArgs {
    /// JSON file with the response batch (reads stdin when omitted)
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Payload type of the responses
    #[arg(long, value_enum, default_value = "generic")]
    pub kind: ResponseKind,

    /// Print one detail block per host group instead of a summary table
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Keep ":port" suffixes in host labels
    #[arg(long)]
    pub host_ports: bool,

    /// Unit base for byte counts
    /// Default: decimal (kB, MB, ...), or the value from --config
    #[arg(long, value_enum, value_name = "BASE")]
    pub byte_units: Option<ByteBase>,

    /// TOML file with default rendering settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref input) = self.input
            && !input.is_file()
        {
            return Err(format!("Input file {} does not exist", input.display()));
        }

        if let Some(ref config) = self.config
            && !config.is_file()
        {
            return Err(format!("Config file {} does not exist", config.display()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs { input: None, kind: ResponseKind::Generic, verbose: false, host_ports: false, byte_units: None, config: None }
    }

    #[test]
    fn test_validate_missing_input_fails() {
        let args = CliArgs { input: Some(PathBuf::from("./no-such-responses.json")), ..args() };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_stdin_succeeds() {
        assert!(args().validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args =
            CliArgs::try_parse_from(["hostlist-report", "--kind", "scan", "-v", "--host-ports", "--byte-units", "binary"])
                .unwrap();
        assert_eq!(args.kind, ResponseKind::Scan);
        assert!(args.verbose);
        assert!(args.host_ports);
        assert_eq!(args.byte_units, Some(ByteBase::Binary));
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(CliArgs::try_parse_from(["hostlist-report", "--kind", "telemetry"]).is_err());
    }
}
