// src/lib.rs

pub mod bootstrap;
pub mod cli;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod outputs;

use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;

use tracing::info;

use crate::cli::LaunchArgs;
use crate::errors::Result;
use crate::exec::ChannelPair;

/// Environment override matched against an output's make or "make model".
pub const OUTPUT_ENV: &str = "WAYBRIDGE_OUTPUT";

/// High-level entry point used by `main.rs`.
///
/// This wires together, strictly in order:
/// - collaborator executable resolution
/// - socket-pair channel creation
/// - the compositor spawn and the output-discovery handshake over the
///   retained control endpoint
/// - output selection and the X server argv translation
/// - the X server spawn
/// - session supervision (the compositor's lifetime brackets the session)
///
/// Every step is fatal on failure; there is no retry and no partial-success
/// mode. The returned code is the compositor's own exit status.
pub fn run(args: LaunchArgs) -> Result<i32> {
    let paths = exec::resolve_paths()?;

    let control = ChannelPair::new("control")?;
    let display = ChannelPair::new("display")?;
    let wm = ChannelPair::new("window-manager")?;

    let mut compositor = exec::spawn_compositor(&paths.compositor, [&control, &display, &wm])?;
    // The transferred endpoints now belong to the compositor.
    drop(control.child);
    drop(display.child);
    drop(wm.child);

    let bootstrap::Bootstrap {
        connection: _connection,
        mut outputs,
    } = bootstrap::discover(UnixStream::from(control.launcher))?;

    if let Ok(label) = std::env::var(OUTPUT_ENV) {
        outputs.select(&label);
    }
    let selected = outputs.finalize()?;
    info!(
        make = %selected.make,
        model = %selected.model,
        geometry = %selected.geometry(),
        "session output selected"
    );

    let argv = cli::xserver_argv(
        &selected.geometry(),
        &wm.launcher.as_raw_fd().to_string(),
        args.verbosity,
        &args.passthrough,
    );
    let _xserver = exec::spawn_xwayland(&paths.xwayland, &argv, &display.launcher, &wm.launcher)?;
    // Same discipline for the X server's endpoints.
    drop(display.launcher);
    drop(wm.launcher);

    exec::supervise(&mut compositor)
}
