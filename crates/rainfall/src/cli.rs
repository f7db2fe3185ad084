#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually to keep the binary lean. `RAINFALL_*` environment
//! variables supply defaults that flags override.

use std::env;
use std::process;
use std::time::Duration;

use rainfall_runtime::RainConfig;
use rainfall_runtime::config::{DEFAULT_ALPHABET, DEFAULT_RESET_PROBABILITY};
use unicode_width::UnicodeWidthChar;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Rainfall: falling glyph columns on a navy backdrop

USAGE:
    rainfall [OPTIONS]

OPTIONS:
    --tick-ms=N              Milliseconds between frames (default: 33)
    --reset-probability=P    Chance per frame that a finished column restarts (default: 0.025)
    --charset=TEXT           Glyphs to draw (default: A-Z, 0-9, @#$%^&*())
    --seed=N                 Fixed random seed for reproducible output
    --exit-after-ms=N        Quit after N milliseconds (0 = never)
    --help, -h               Show this help message
    --version, -V            Show version

KEYBINDINGS:
    q / Esc / Ctrl+C         Quit

ENVIRONMENT VARIABLES (command-line flags take precedence):
    RAINFALL_TICK_MS              Default for --tick-ms
    RAINFALL_RESET_PROBABILITY    Default for --reset-probability
    RAINFALL_CHARSET              Default for --charset
    RAINFALL_SEED                 Default for --seed
    RAINFALL_EXIT_AFTER_MS        Default for --exit-after-ms
    RAINFALL_LOG_FILE             Write logs to this file (off when unset)
    RAINFALL_LOG                  Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Milliseconds between ticks.
    pub tick_ms: u64,
    /// Per-tick reset probability.
    pub reset_probability: f64,
    /// Glyph set.
    pub charset: String,
    /// Fixed RNG seed.
    pub seed: Option<u64>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            tick_ms: 33,
            reset_probability: DEFAULT_RESET_PROBABILITY,
            charset: DEFAULT_ALPHABET.to_string(),
            seed: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the backdrop.
    Run(Opts),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("rainfall {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Auto-exit delay, if enabled.
    pub fn exit_after(&self) -> Option<Duration> {
        (self.exit_after_ms > 0).then(|| Duration::from_millis(self.exit_after_ms))
    }

    /// Build the render loop configuration.
    ///
    /// Control characters and glyphs that do not occupy exactly one terminal
    /// cell are dropped.
    pub fn rain_config(&self) -> RainConfig {
        let mut config = RainConfig::default()
            .with_tick_period(Duration::from_millis(self.tick_ms))
            .with_reset_probability(self.reset_probability);
        config.alphabet = self
            .charset
            .chars()
            .filter(|c| !c.is_control() && c.width() == Some(1))
            .collect();
        config.seed = self.seed;
        config
    }
}

/// Parse `args` (without the program name) with `env` as the variable
/// lookup. Environment values override defaults; flags override both.
pub fn parse_from<F>(args: &[String], env: F) -> Result<Command, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    // Apply environment variable defaults first
    if let Some(val) = env("RAINFALL_TICK_MS") {
        opts.tick_ms = parse_value("RAINFALL_TICK_MS", &val)?;
    }
    if let Some(val) = env("RAINFALL_RESET_PROBABILITY") {
        opts.reset_probability = parse_value("RAINFALL_RESET_PROBABILITY", &val)?;
    }
    if let Some(val) = env("RAINFALL_CHARSET") {
        opts.charset = val;
    }
    if let Some(val) = env("RAINFALL_SEED") {
        opts.seed = Some(parse_value("RAINFALL_SEED", &val)?);
    }
    if let Some(val) = env("RAINFALL_EXIT_AFTER_MS") {
        opts.exit_after_ms = parse_value("RAINFALL_EXIT_AFTER_MS", &val)?;
    }

    // Parse command-line args (override env vars)
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => {
                if let Some(val) = other.strip_prefix("--tick-ms=") {
                    opts.tick_ms = parse_value("--tick-ms", val)?;
                } else if let Some(val) = other.strip_prefix("--reset-probability=") {
                    opts.reset_probability = parse_value("--reset-probability", val)?;
                } else if let Some(val) = other.strip_prefix("--charset=") {
                    opts.charset = val.to_string();
                } else if let Some(val) = other.strip_prefix("--seed=") {
                    opts.seed = Some(parse_value("--seed", val)?);
                } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                    opts.exit_after_ms = parse_value("--exit-after-ms", val)?;
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    Ok(Command::Run(opts))
}

fn parse_value<T: std::str::FromStr>(name: &str, val: &str) -> Result<T, String> {
    val.trim()
        .parse()
        .map_err(|_| format!("Invalid {name} value: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(cmd: Result<Command, String>) -> Opts {
        match cmd {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run(parse_from(&[], no_env));
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.tick_ms, 33);
        assert_eq!(opts.reset_probability, 0.025);
        assert_eq!(opts.exit_after(), None);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(parse_from(
            &args(&[
                "--tick-ms=50",
                "--reset-probability=0.5",
                "--charset=01",
                "--seed=9",
                "--exit-after-ms=1500",
            ]),
            no_env,
        ));
        assert_eq!(opts.tick_ms, 50);
        assert_eq!(opts.reset_probability, 0.5);
        assert_eq!(opts.charset, "01");
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.exit_after(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = |key: &str| match key {
            "RAINFALL_TICK_MS" => Some("20".to_string()),
            "RAINFALL_SEED" => Some("4".to_string()),
            _ => None,
        };
        let opts = run(parse_from(&args(&["--tick-ms=40"]), env));
        assert_eq!(opts.tick_ms, 40);
        assert_eq!(opts.seed, Some(4));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse_from(&args(&["-h"]), no_env), Ok(Command::Help));
        assert_eq!(parse_from(&args(&["--version"]), no_env), Ok(Command::Version));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(
            parse_from(&args(&["--tick-ms=fast"]), no_env),
            Err("Invalid --tick-ms value: fast".to_string())
        );
        let env = |key: &str| (key == "RAINFALL_SEED").then(|| "x".to_string());
        assert!(parse_from(&[], env).is_err());
        assert_eq!(
            parse_from(&args(&["--bogus"]), no_env),
            Err("Unknown argument: --bogus".to_string())
        );
    }

    #[test]
    fn rain_config_filters_wide_glyphs() {
        let opts = Opts {
            charset: "aア\tb".to_string(),
            seed: Some(1),
            ..Opts::default()
        };
        let config = opts.rain_config();
        assert_eq!(config.alphabet, vec!['a', 'b']);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.tick_period, Duration::from_millis(33));
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_every_flag() {
        for flag in [
            "--tick-ms",
            "--reset-probability",
            "--charset",
            "--seed",
            "--exit-after-ms",
            "RAINFALL_LOG_FILE",
        ] {
            assert!(HELP_TEXT.contains(flag), "missing {flag}");
        }
    }

    #[test]
    fn help_text_matches_env_precedence() {
        assert!(HELP_TEXT.contains("RAINFALL_TICK_MS              Default for --tick-ms"));
        assert!(!HELP_TEXT.contains("Override --"));

        // The documented precedence is the one parse_from applies.
        let env = |key: &str| (key == "RAINFALL_TICK_MS").then(|| "20".to_string());
        assert_eq!(run(parse_from(&[], env)).tick_ms, 20);
        assert_eq!(run(parse_from(&args(&["--tick-ms=40"]), env)).tick_ms, 40);
    }
}
