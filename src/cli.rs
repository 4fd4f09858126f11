use std::env;
use std::path::PathBuf;

#[cfg(feature = "api")]
const DEFAULT_PORT: u16 = 3000;

/// Parsed command line.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub quote: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub projection_out: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

impl CliOptions {
    #[cfg(feature = "api")]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--quote" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --quote (expected a TOML file path)")?;
                if opts.quote.replace(PathBuf::from(path)).is_some() {
                    return Err("--quote provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--projection-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --projection-out (expected a file path)",
                )?;
                if opts.projection_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--projection-out provided more than once".to_string());
                }
            }
            "--verbose" | "-v" => opts.verbose = true,
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    #[cfg(feature = "api")]
    {
        if opts.port.is_some() && !opts.serve {
            return Err("--port requires --serve".to_string());
        }
        if opts.serve {
            if opts.quote.is_some() || opts.projection_out.is_some() {
                return Err(
                    "--serve cannot be combined with --quote or --projection-out".to_string(),
                );
            }
            return Ok(opts);
        }
    }

    if opts.quote.is_none() {
        return Err("missing required argument --quote <path>".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("solar-quote: solar quote, rebate and compliance calculator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  solar-quote --quote <path> [--config <path>] [--projection-out <path>] [--verbose]"
    );
    #[cfg(feature = "api")]
    eprintln!("  solar-quote --serve [--port <u16>] [--config <path>] [--verbose]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --quote <path>           Installation to quote (TOML)");
    eprintln!("  --config <path>          Pricing and limits (TOML); built-in defaults otherwise");
    eprintln!("  --projection-out <path>  Write the 25-year projection to CSV");
    eprintln!("  --verbose, -v            Log calculation detail to stderr");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the JSON API server");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help, -h               Show this help message");
}
