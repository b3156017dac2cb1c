//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use turnstile_domain::OutputMode;

/// Conformance-test harness for HTTP reverse-proxy/ingress implementations.
#[derive(Debug, Parser)]
#[command(name = "turnstile", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run conformance checks against an ingress implementation.
    Run(RunArgs),
    /// List the registered checks.
    List,
    /// Serve the reference echo backend.
    Echo(EchoArgs),
}

/// Arguments for `turnstile run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Namespace the declared ingress resources live in.
    #[arg(long, default_value = "default")]
    pub namespace: String,

    /// Fallback host for any ingress without an explicit mapping. This is
    /// the common case: one external proxy address routing by Host header.
    #[arg(long, value_name = "HOST")]
    pub target: Option<String>,

    /// Explicit ingress mapping, repeatable. NAME is `name` (in the run
    /// namespace) or `namespace/name`.
    #[arg(long = "host-mapping", value_name = "NAME=HOST")]
    pub host_mappings: Vec<String>,

    /// Per-probe timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Retry attempts for checks that hit infrastructure errors.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Only run the named check, repeatable. Defaults to every check.
    #[arg(long = "check", value_name = "NAME")]
    pub checks: Vec<String>,

    /// Report output mode (`text` or `json`).
    #[arg(long, default_value = "text")]
    pub output: OutputMode,
}

/// Arguments for `turnstile echo`.
#[derive(Debug, Args)]
pub struct EchoArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub addr: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_run_args_parse() {
        let cli = Cli::try_parse_from([
            "turnstile",
            "run",
            "--namespace",
            "conformance",
            "--target",
            "203.0.113.10",
            "--host-mapping",
            "host-rules=198.51.100.1",
            "--timeout-ms",
            "750",
            "--retries",
            "2",
            "--check",
            "host-rules",
            "--output",
            "json",
        ])
        .unwrap();

        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.namespace, "conformance");
        assert_eq!(args.target.as_deref(), Some("203.0.113.10"));
        assert_eq!(args.host_mappings, vec!["host-rules=198.51.100.1"]);
        assert_eq!(args.timeout_ms, 750);
        assert_eq!(args.retries, 2);
        assert_eq!(args.checks, vec!["host-rules"]);
        assert_eq!(args.output, OutputMode::Json);
    }

    #[test]
    fn test_bad_output_mode_is_rejected() {
        assert!(Cli::try_parse_from(["turnstile", "run", "--output", "yaml"]).is_err());
    }

    #[test]
    fn test_echo_defaults() {
        let cli = Cli::try_parse_from(["turnstile", "echo"]).unwrap();
        let Command::Echo(args) = cli.command else {
            panic!("expected echo subcommand");
        };
        assert_eq!(args.addr, "127.0.0.1:3000");
    }
}
