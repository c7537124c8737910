#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `CTXTREE_DEMO_*` prefix.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
ctxtree demo: a Toggle at the root, read four components down

USAGE:
    ctxtree-demo [OPTIONS]

OPTIONS:
    --clicks=N     Click the switch N times, printing a frame after each (default: 3)
    --json         Print each frame as a JSON snapshot instead of text
    --log-json     Emit structured JSON logs on stderr (filter via CTXTREE_LOG)
    --help, -h     Show this help message
    --version, -V  Show version

TREE:
    Toggle
    +-- Layer1
        +-- Layer2   (Toggle.Consumer: \"The button is on/off\")
            +-- Layer3
                +-- Layer4  (Toggle.Consumer: Switch)

ENVIRONMENT VARIABLES:
    CTXTREE_DEMO_CLICKS   Override --clicks
    CTXTREE_DEMO_JSON     Override --json (1/true to enable)
    CTXTREE_LOG           Log filter directive for --log-json (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Number of simulated switch clicks.
    pub clicks: u32,
    /// Print JSON snapshots instead of text.
    pub json: bool,
    /// Install the JSON log subscriber.
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            clicks: 3,
            json: false,
            log_json: false,
        }
    }
}

/// What the process should do after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Parse `args` (without the program name) on top of environment defaults
/// read through `var`. Explicit flags win over the environment.
pub fn parse_from<I, F>(args: I, var: F) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    if let Some(val) = var("CTXTREE_DEMO_CLICKS")
        && let Ok(n) = val.parse()
    {
        opts.clicks = n;
    }
    if let Some(val) = var("CTXTREE_DEMO_JSON") {
        opts.json = truthy(&val);
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--json" => opts.json = true,
            "--log-json" => opts.log_json = true,
            other => {
                if let Some(val) = other.strip_prefix("--clicks=") {
                    opts.clicks = val
                        .parse()
                        .map_err(|_| format!("Invalid --clicks value: {val}"))?;
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    Ok(Command::Run(opts))
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad argument.
    pub fn parse() -> Self {
        match parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("ctxtree-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, String> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        parse_from(args.iter().map(|a| (*a).to_string()), |key| {
            env.get(key).cloned()
        })
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.clicks, 3);
        assert!(!opts.json);
        assert!(!opts.log_json);
        assert_eq!(parse(&[], &[]), Ok(Command::Run(opts)));
    }

    #[test]
    fn flags_are_parsed() {
        let Ok(Command::Run(opts)) = parse(&["--clicks=7", "--json", "--log-json"], &[]) else {
            panic!("expected run");
        };
        assert_eq!(opts.clicks, 7);
        assert!(opts.json);
        assert!(opts.log_json);
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = [("CTXTREE_DEMO_CLICKS", "5"), ("CTXTREE_DEMO_JSON", "TRUE")];
        let Ok(Command::Run(opts)) = parse(&[], &env) else {
            panic!("expected run");
        };
        assert_eq!(opts.clicks, 5);
        assert!(opts.json);

        let Ok(Command::Run(opts)) = parse(&["--clicks=1"], &env) else {
            panic!("expected run");
        };
        assert_eq!(opts.clicks, 1);
    }

    #[test]
    fn unparsable_env_is_ignored() {
        let Ok(Command::Run(opts)) = parse(&[], &[("CTXTREE_DEMO_CLICKS", "lots")]) else {
            panic!("expected run");
        };
        assert_eq!(opts.clicks, 3);
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["-h", "--bogus"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["--version"], &[]), Ok(Command::Version));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(
            parse(&["--clicks=x"], &[]),
            Err("Invalid --clicks value: x".to_string())
        );
        assert_eq!(
            parse(&["--frobnicate"], &[]),
            Err("Unknown argument: --frobnicate".to_string())
        );
    }

    #[test]
    fn help_text_contains_env_vars() {
        assert!(HELP_TEXT.contains("CTXTREE_DEMO_CLICKS"));
        assert!(HELP_TEXT.contains("CTXTREE_DEMO_JSON"));
        assert!(HELP_TEXT.contains("CTXTREE_LOG"));
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
