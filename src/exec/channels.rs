// src/exec/channels.rs

//! Anonymous socket-pair channels between the launcher and its children.

use std::os::fd::{AsRawFd, OwnedFd};

use nix::sys::socket::{AddressFamily, SockFlag, SockType, socketpair};

use crate::errors::{Result, WaybridgeError};

/// A connected pair of anonymous Unix sockets.
///
/// One endpoint stays with the launcher, the other is handed to a child as a
/// decimal file-descriptor token in argv (or via `WAYLAND_SOCKET`). For the
/// display and window-manager channels the launcher-side endpoint is itself
/// transferred to the second child later; either way, each endpoint is owned
/// by exactly one process after the spawns, and the launcher drops its copy
/// of every transferred endpoint right after the spawn that carried it.
///
/// Both ends are created close-on-exec; a child's `pre_exec` hook re-enables
/// inheritance for exactly the endpoints that child owns, so descriptors
/// never leak across process generations.
#[derive(Debug)]
pub struct ChannelPair {
    pub launcher: OwnedFd,
    pub child: OwnedFd,
}

impl ChannelPair {
    pub fn new(purpose: &str) -> Result<Self> {
        let (launcher, child) = socketpair(
            AddressFamily::Unix,
            SockType::Stream,
            None,
            SockFlag::SOCK_CLOEXEC,
        )
        .map_err(|err| {
            WaybridgeError::Resource(format!("unable to create {purpose} socket pair: {err}"))
        })?;
        Ok(Self { launcher, child })
    }

    /// Decimal token for the child's endpoint, as passed in argv.
    pub fn child_fd_token(&self) -> String {
        self.child.as_raw_fd().to_string()
    }
}
