// src/exec/spawn.rs

//! Executable resolution, child spawning and session supervision.

use std::io;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use nix::unistd::{AccessFlags, access};
use tracing::{debug, info};

use crate::errors::{Result, WaybridgeError};
use crate::exec::channels::ChannelPair;

pub const COMPOSITOR_PATH_ENV: &str = "WAYBRIDGE_COMPOSITOR_PATH";
pub const XWAYLAND_PATH_ENV: &str = "WAYBRIDGE_XWAYLAND_PATH";

const DEFAULT_COMPOSITOR_PATH: &str = "/usr/libexec/waybridge-compositor";
const DEFAULT_XWAYLAND_PATH: &str = "/usr/bin/Xwayland";

/// Session variables a child must not inherit from the invoking session.
const STALE_SESSION_VARS: &[&str] = &["WAYLAND_DISPLAY", "WAYLAND_SOCKET", "DISPLAY"];

#[derive(Debug, Clone)]
pub struct ExecutablePaths {
    pub compositor: PathBuf,
    pub xwayland: PathBuf,
}

/// Resolve both collaborator executables, preferring the environment
/// overrides over the compiled-in defaults, and verify them before any other
/// startup work happens.
pub fn resolve_paths() -> Result<ExecutablePaths> {
    let compositor = PathBuf::from(
        std::env::var_os(COMPOSITOR_PATH_ENV).unwrap_or_else(|| DEFAULT_COMPOSITOR_PATH.into()),
    );
    let xwayland = PathBuf::from(
        std::env::var_os(XWAYLAND_PATH_ENV).unwrap_or_else(|| DEFAULT_XWAYLAND_PATH.into()),
    );
    require_executable(&compositor, "compositor")?;
    require_executable(&xwayland, "X server")?;
    Ok(ExecutablePaths {
        compositor,
        xwayland,
    })
}

/// Fail unless `path` points at an executable file.
pub fn require_executable(path: &Path, role: &str) -> Result<()> {
    access(path, AccessFlags::X_OK).map_err(|_| {
        WaybridgeError::Environment(format!(
            "{role} executable {} not found or not executable",
            path.display()
        ))
    })
}

/// Spawn the compositor with its channel endpoints as decimal fd tokens in
/// argv, in channel order: control, display, window manager.
pub fn spawn_compositor(path: &Path, channels: [&ChannelPair; 3]) -> Result<Child> {
    let mut command = Command::new(path);
    for channel in channels {
        command.arg(channel.child_fd_token());
    }
    scrub_session_env(&mut command);
    inherit_fds(
        &mut command,
        channels.map(|channel| channel.child.as_raw_fd()).to_vec(),
    );

    let child = command.spawn().map_err(|err| {
        WaybridgeError::Resource(format!(
            "failed to launch compositor {}: {err}",
            path.display()
        ))
    })?;
    info!(pid = child.id(), "compositor started");
    Ok(child)
}

/// Spawn the X server with the translated argument vector. Its display
/// endpoint is announced via `WAYLAND_SOCKET`; the window-manager endpoint is
/// already referenced by the `-wm` token inside `argv`.
pub fn spawn_xwayland(
    path: &Path,
    argv: &[String],
    display_endpoint: &OwnedFd,
    wm_endpoint: &OwnedFd,
) -> Result<Child> {
    debug!(?argv, "X server argument vector");

    let mut command = Command::new(path);
    command.args(argv);
    scrub_session_env(&mut command);
    command.env(
        "WAYLAND_SOCKET",
        display_endpoint.as_raw_fd().to_string(),
    );
    inherit_fds(
        &mut command,
        vec![display_endpoint.as_raw_fd(), wm_endpoint.as_raw_fd()],
    );

    let child = command.spawn().map_err(|err| {
        WaybridgeError::Resource(format!(
            "failed to launch X server {}: {err}",
            path.display()
        ))
    })?;
    info!(pid = child.id(), "X server started");
    Ok(child)
}

/// Block until the compositor exits and mirror its status.
///
/// The compositor's lifetime brackets the whole session; the X server is
/// disposable and never waited on.
pub fn supervise(compositor: &mut Child) -> Result<i32> {
    let status = compositor
        .wait()
        .map_err(|err| WaybridgeError::Resource(format!("waiting for compositor: {err}")))?;
    let code = status
        .code()
        .unwrap_or_else(|| status.signal().map_or(1, |signal| 128 + signal));
    info!(exit_code = code, "compositor exited, ending session");
    Ok(code)
}

fn scrub_session_env(command: &mut Command) {
    for var in STALE_SESSION_VARS {
        command.env_remove(var);
    }
}

/// Re-enable inheritance for exactly the endpoints this child owns.
///
/// All channel endpoints are close-on-exec in the launcher; the hook clears
/// the flag for the listed descriptors between fork and exec. `fcntl` with
/// `F_SETFD` is async-signal-safe.
fn inherit_fds(command: &mut Command, fds: Vec<RawFd>) {
    unsafe {
        command.pre_exec(move || {
            for &fd in &fds {
                if libc::fcntl(fd, libc::F_SETFD, 0) == -1 {
                    return Err(io::Error::last_os_error());
                }
            }
            Ok(())
        });
    }
}
