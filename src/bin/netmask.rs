//! An address netmask generation utility.
//!
//! Every spec on the command line (or in the given files) is merged into
//! one set, which is printed as the smallest list of blocks covering it.
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use log::{debug, warn, LevelFilter};

use netmask::config::{Config, MergeMode};
use netmask::parse::SpecParser;
use netmask::render::OutputStyle;
use netmask::resolve::{NoResolver, Resolver, SystemResolver};
use netmask::NetTree;

#[derive(Parser)]
#[command(
    version,
    about = "This is netmask, an address netmask generation utility",
    long_about = None,
    disable_version_flag = true,
    after_help = SPEC_HELP
)]
#[command(group(
    ArgGroup::new("style")
        .args(["standard", "cidr", "cisco", "range", "hex", "octal", "binary", "json"])
))]
struct Cli {
    /// Output address/netmask pairs
    #[arg(short, long, default_value_t = false)]
    standard: bool,

    /// Output CIDR format address lists (the default)
    #[arg(short, long, default_value_t = false)]
    cidr: bool,

    /// Output Cisco style address lists
    #[arg(short = 'i', long, default_value_t = false)]
    cisco: bool,

    /// Output ip address ranges
    #[arg(short, long, default_value_t = false)]
    range: bool,

    /// Output address/netmask pairs in hex
    #[arg(short = 'x', long, default_value_t = false)]
    hex: bool,

    /// Output address/netmask pairs in octal
    #[arg(short, long, default_value_t = false)]
    octal: bool,

    /// Output address/netmask pairs in binary
    #[arg(short, long, default_value_t = false)]
    binary: bool,

    /// Output one JSON object per line
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Disable DNS lookups for addresses
    #[arg(short, long, default_value_t = false)]
    nodns: bool,

    /// Treat arguments as input files, `-` being stdin
    #[arg(short, long, default_value_t = false)]
    files: bool,

    /// Print status/progress information and a dump of the final tree.
    /// Implies --strict.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Check the tree invariants after every merge step
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Print the version number
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Specs to merge, or files holding them with --files.
    #[arg(required = true)]
    specs: Vec<String>,
}

const SPEC_HELP: &str = "\
Definitions:
  a spec can be any of:
    address
    address:address
    address:+address
    address,address
    address,+address
    address/mask
  an address can be any of:
    N           decimal number
    0N          octal number
    0xN         hex number
    N.N.N.N     dotted quad
    hostname    dns domain name
  a mask is the number of bits set to one from the left,
  or a netmask or Cisco wildcard mask in address form";

impl Cli {
    fn config(&self) -> Config {
        let output = if self.standard {
            OutputStyle::Standard
        } else if self.cisco {
            OutputStyle::Cisco
        } else if self.range {
            OutputStyle::Range
        } else if self.hex {
            OutputStyle::Hex
        } else if self.octal {
            OutputStyle::Octal
        } else if self.binary {
            OutputStyle::Binary
        } else if self.json {
            OutputStyle::Json
        } else {
            OutputStyle::Cidr
        };
        Config {
            output,
            dns: !self.nodns,
            files: self.files,
            debug: self.debug,
            merge_mode: if self.strict || self.debug {
                MergeMode::Strict
            } else {
                MergeMode::Fast
            },
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(|buf, record| writeln!(buf, "netmask: {}", record.args()))
        .try_init();
}

// Whitespace separated specs from a file, or stdin for `-`.
fn read_specs(path: &str) -> io::Result<Vec<String>> {
    let text = if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(path)?
    };
    Ok(text.split_whitespace().map(str::to_string).collect())
}

fn add_entry<R: Resolver>(
    tree: &mut NetTree,
    parser: &SpecParser<R>,
    spec: &str,
) -> bool {
    match parser.parse(spec) {
        Ok(entry) => {
            tree.insert(entry);
            true
        }
        Err(err) => {
            warn!("parse error \"{}\"", spec);
            debug!("{}", err);
            false
        }
    }
}

// Help and version requests succeed, every other command line error is a
// usage error with status 1.
fn usage_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_status(&err));
        }
    };
    let config = cli.config();
    init_logging(config.debug);
    debug!("{:?}", config);

    let resolver: &dyn Resolver = if config.dns {
        &SystemResolver
    } else {
        &NoResolver
    };
    let parser = SpecParser::with_mode(resolver, config.merge_mode);

    let mut tree = NetTree::with_mode(config.merge_mode);
    let mut all_ok = true;
    for arg in &cli.specs {
        if config.files {
            let specs = match read_specs(arg) {
                Ok(specs) => specs,
                Err(err) => {
                    warn!("{}: {}", arg, err);
                    continue;
                }
            };
            for spec in &specs {
                all_ok &= add_entry(&mut tree, &parser, spec);
            }
        } else {
            all_ok &= add_entry(&mut tree, &parser, arg);
        }
    }

    let mut out = io::stdout().lock();
    for cidr in &tree {
        if writeln!(out, "{}", config.output.render(&cidr)).is_err() {
            // Most likely a closed pipe, nobody is listening any more.
            return ExitCode::FAILURE;
        }
    }
    if config.debug {
        debug!("tree:\n{}", tree.dump());
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
