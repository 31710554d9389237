// src/cli.rs

//! The legacy single-dash CLI dialect and its translation.
//!
//! The launcher presents the flat option surface of a classic X server:
//! recognized options are consumed from the command line (whether the
//! launcher acts on them or not), everything else passes through verbatim to
//! the spawned X server. `clap` cannot model this dialect (single-dash
//! multi-character names plus unrecognized-token pass-through), so the table
//! below drives a small hand-rolled scanner instead.

use tracing::Level;

use crate::errors::{Result, WaybridgeError};

/// Operand arity of a legacy option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Required,
}

/// Whether the launcher acts on an option's value or merely swallows it.
///
/// Both kinds are dropped from the pass-through set; the distinction only
/// controls whether the option carries launcher-side semantics (and shows up
/// in `-help`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Handled,
    Ignored,
}

/// One entry of the immutable legacy option table.
#[derive(Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arity: Arity,
    pub disposition: Disposition,
}

const fn ignored(name: &'static str, arity: Arity) -> OptionSpec {
    OptionSpec {
        name,
        description: "",
        arity,
        disposition: Disposition::Ignored,
    }
}

/// The legacy dialect: options handled by the launcher, options consumed and
/// dropped, and the Xorg(1)-specific set that X servers of this lineage have
/// always swallowed.
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "-help",
        description: "show this help page",
        arity: Arity::None,
        disposition: Disposition::Handled,
    },
    OptionSpec {
        name: "-showconfig",
        description: "alias to -version",
        arity: Arity::None,
        disposition: Disposition::Handled,
    },
    OptionSpec {
        name: "-version",
        description: "show the waybridge version",
        arity: Arity::None,
        disposition: Disposition::Handled,
    },
    OptionSpec {
        name: "-verbose",
        description: "set logging verbosity (0..=20)",
        arity: Arity::Required,
        disposition: Disposition::Handled,
    },
    // Options meaningful to the wrapped X server lineage but not to us.
    ignored("-decorate", Arity::None),
    ignored("-enable-ei-portal", Arity::None),
    ignored("-fullscreen", Arity::None),
    ignored("-geometry", Arity::Required),
    ignored("-glamor", Arity::Required),
    ignored("-hidpi", Arity::None),
    ignored("-host-grab", Arity::None),
    ignored("-noTouchPointerEmulation", Arity::None),
    ignored("-force-xrandr-emulation", Arity::None),
    ignored("-nokeymap", Arity::None),
    ignored("-rootless", Arity::None),
    ignored("-shm", Arity::None),
    ignored("-wm", Arity::Required),
    // Xorg(1)-specific options.
    ignored("-allowMouseOpenFail", Arity::None),
    ignored("-allowNonLocalXvidtune", Arity::None),
    ignored("-bgamma", Arity::Required),
    ignored("-bpp", Arity::Required),
    ignored("-config", Arity::Required),
    ignored("-configdir", Arity::Required),
    ignored("-configure", Arity::Required),
    ignored("-crt", Arity::Required),
    ignored("-depth", Arity::Required),
    ignored("-disableVidMode", Arity::None),
    ignored("-fbbpp", Arity::Required),
    ignored("-gamma", Arity::Required),
    ignored("-ggamma", Arity::Required),
    ignored("-ignoreABI", Arity::None),
    ignored("-isolateDevice", Arity::Required),
    ignored("-keeptty", Arity::None),
    ignored("-keyboard", Arity::Required),
    ignored("-layout", Arity::Required),
    ignored("-logverbose", Arity::Required),
    ignored("-modulepath", Arity::Required),
    ignored("-noautoBindGPU", Arity::None),
    ignored("-nosilk", Arity::None),
    ignored("-novtswitch", Arity::None),
    ignored("-pointer", Arity::Required),
    ignored("-quiet", Arity::None),
    ignored("-rgamma", Arity::Required),
    ignored("-sharevts", Arity::None),
    ignored("-screen", Arity::Required),
    ignored("-showDefaultModulePath", Arity::None),
    ignored("-showDefaultLibPath", Arity::None),
    ignored("-showopts", Arity::None),
    ignored("-weight", Arity::Required),
];

/// Delay operand of the synthesized `-terminate` pair.
const TERMINATE_DELAY: &str = "3";

/// What a command line asks the launcher to do.
#[derive(Debug)]
pub enum Invocation {
    Help,
    Version,
    Launch(LaunchArgs),
}

/// Everything `run` needs from the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchArgs {
    /// Severity level from `-verbose <n>`, already range-checked.
    pub verbosity: Option<u8>,
    /// Tokens the launcher did not recognize, in their original order.
    pub passthrough: Vec<String>,
}

/// Parse the raw token sequence (program name excluded).
///
/// `-help`, `-version` and `-showconfig` short-circuit before any socket or
/// process work. A malformed `-verbose` operand is a usage error, reported
/// before anything is spawned.
pub fn parse(tokens: &[String]) -> Result<Invocation> {
    for token in tokens {
        match token.as_str() {
            "-help" => return Ok(Invocation::Help),
            "-version" | "-showconfig" => return Ok(Invocation::Version),
            _ => {}
        }
    }

    let mut verbosity = None;
    let mut index = 0;
    while index < tokens.len() {
        match lookup(&tokens[index]) {
            Some(spec) => {
                let operand = match spec.arity {
                    Arity::Required => tokens.get(index + 1),
                    Arity::None => None,
                };
                if spec.disposition == Disposition::Handled && spec.name == "-verbose" {
                    // A bare trailing -verbose is consumed without an operand
                    // and leaves the verbosity unset.
                    if let Some(operand) = operand {
                        verbosity = Some(parse_verbosity(operand)?);
                    }
                }
                index += if operand.is_some() { 2 } else { 1 };
            }
            None => index += 1,
        }
    }

    Ok(Invocation::Launch(LaunchArgs {
        verbosity,
        passthrough: filter_passthrough(tokens),
    }))
}

/// Remove every recognized option (and its operand, when present) from the
/// token sequence, preserving the relative order of everything else.
///
/// An operand-bearing option at the end of the sequence is consumed bare; it
/// never steals a nonexistent operand. Filtering is idempotent: the result
/// contains no recognized names, so re-filtering it is a no-op.
pub fn filter_passthrough(tokens: &[String]) -> Vec<String> {
    let mut passthrough = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        match lookup(&tokens[index]) {
            Some(spec) => {
                index += 1;
                if spec.arity == Arity::Required && index < tokens.len() {
                    index += 1;
                }
            }
            None => {
                passthrough.push(tokens[index].clone());
                index += 1;
            }
        }
    }
    passthrough
}

/// Build the X server's argument vector: the synthesized arguments first,
/// then the filtered pass-through set.
pub fn xserver_argv(
    geometry: &str,
    wm_fd_token: &str,
    verbosity: Option<u8>,
    passthrough: &[String],
) -> Vec<String> {
    let mut argv = vec![
        "-rootless".to_string(),
        "-terminate".to_string(),
        TERMINATE_DELAY.to_string(),
        "-geometry".to_string(),
        geometry.to_string(),
        "-wm".to_string(),
        wm_fd_token.to_string(),
    ];
    if let Some(level) = verbosity {
        argv.push("-verbose".to_string());
        argv.push(level.to_string());
    }
    argv.extend(passthrough.iter().cloned());
    argv
}

/// Map a `-verbose` level to a logging severity.
pub fn verbosity_level(level: u8) -> Level {
    match level {
        0 => Level::ERROR,
        1..=3 => Level::WARN,
        4..=5 => Level::INFO,
        _ => Level::DEBUG,
    }
}

pub fn print_help() {
    println!("waybridge - X.Org compatibility layer");
    println!("Usage: waybridge [:<display>] [option]");
    for spec in OPTIONS {
        if spec.disposition == Disposition::Handled {
            let operand = match spec.arity {
                Arity::Required => " opt",
                Arity::None => "",
            };
            println!("    {}{}\t\t{}", spec.name, operand, spec.description);
        }
    }
}

pub fn print_version() {
    println!("waybridge - X.Org compatibility layer");
    println!("Version {}", env!("CARGO_PKG_VERSION"));
}

fn lookup(token: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.name == token)
}

fn parse_verbosity(raw: &str) -> Result<u8> {
    let level: i64 = raw.parse().map_err(|_| {
        WaybridgeError::Usage(format!("-verbose expects an integer level, got '{raw}'"))
    })?;
    if !(0..=20).contains(&level) {
        return Err(WaybridgeError::Usage(format!(
            "-verbose level {level} is out of range (0..=20)"
        )));
    }
    Ok(level as u8)
}
