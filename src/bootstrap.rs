// src/bootstrap.rs

//! Minimal Wayland client that learns output geometry from the compositor.
//!
//! The launcher keeps one end of the control socket pair and speaks just
//! enough of the protocol to fill the [`OutputDirectory`] before the X server
//! is spawned: the X server's target geometry must be supplied at spawn
//! time, it cannot be renegotiated later.
//!
//! Two sequential roundtrips act as synchronization barriers:
//! - barrier 1 flushes all registry globals and basic output events;
//! - barrier 2 is issued only after every extended-info binding triggered by
//!   barrier 1 has been requested, so extended attributes are populated for
//!   every display afterwards.
//!
//! This is a one-shot handshake: a connection failure is fatal and never
//! retried.

use std::os::unix::net::UnixStream;

use tracing::{debug, info};
use wayland_client::{
    Connection, Dispatch, EventQueue, Proxy, QueueHandle, WEnum,
    protocol::{wl_output, wl_registry},
};
use wayland_protocols::xdg::xdg_output::zv1::client::{zxdg_output_manager_v1, zxdg_output_v1};

use crate::errors::{Result, WaybridgeError};
use crate::outputs::{OutputDirectory, OutputEvent, Subpixel, Transform};

/// The finished handshake.
pub struct Bootstrap {
    /// Control connection to the compositor. It stays open for the life of
    /// the session; closing it would tear the session down.
    pub connection: Connection,
    pub outputs: OutputDirectory,
}

struct BootstrapState {
    directory: OutputDirectory,
    output_manager: Option<zxdg_output_manager_v1::ZxdgOutputManagerV1>,
    wl_outputs: Vec<(u32, wl_output::WlOutput)>,
    xdg_outputs: Vec<zxdg_output_v1::ZxdgOutputV1>,
}

/// Run the discovery handshake over the launcher's control endpoint.
pub fn discover(socket: UnixStream) -> Result<Bootstrap> {
    let connection = Connection::from_socket(socket).map_err(|err| {
        WaybridgeError::Protocol(format!("unable to connect to the compositor: {err}"))
    })?;

    let mut queue = connection.new_event_queue();
    let qh = queue.handle();
    let _registry = connection.display().get_registry(&qh, ());

    let mut state = BootstrapState {
        directory: OutputDirectory::new(),
        output_manager: None,
        wl_outputs: Vec::new(),
        xdg_outputs: Vec::new(),
    };

    // Barrier 1: registry globals and basic output events are in.
    roundtrip(&mut queue, &mut state)?;
    // Barrier 2: the extended attributes requested during barrier 1 are in.
    roundtrip(&mut queue, &mut state)?;

    state.directory.mark_ready();
    info!(outputs = state.directory.len(), "output discovery finished");

    Ok(Bootstrap {
        connection,
        outputs: state.directory,
    })
}

fn roundtrip(queue: &mut EventQueue<BootstrapState>, state: &mut BootstrapState) -> Result<()> {
    queue.roundtrip(state).map_err(|err| {
        WaybridgeError::Protocol(format!("compositor roundtrip failed: {err}"))
    })?;
    Ok(())
}

impl BootstrapState {
    /// Request extended info for one output, once the capability is known.
    fn bind_extended(
        &mut self,
        output: &wl_output::WlOutput,
        id: u32,
        qh: &QueueHandle<Self>,
    ) {
        if let Some(manager) = &self.output_manager {
            self.xdg_outputs.push(manager.get_xdg_output(output, qh, id));
        }
    }
}

impl Dispatch<wl_registry::WlRegistry, ()> for BootstrapState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            if interface == wl_output::WlOutput::interface().name {
                let output = registry.bind::<wl_output::WlOutput, u32, Self>(
                    name,
                    version.min(3),
                    qh,
                    name,
                );
                debug!(name, "display global discovered");
                state.directory.register(name);
                state.bind_extended(&output, name, qh);
                state.wl_outputs.push((name, output));
            } else if interface == zxdg_output_manager_v1::ZxdgOutputManagerV1::interface().name {
                let manager = registry
                    .bind::<zxdg_output_manager_v1::ZxdgOutputManagerV1, (), Self>(
                        name,
                        version.min(2),
                        qh,
                        (),
                    );
                debug!("extended output info available");
                state.output_manager = Some(manager);
                // The capability may show up after displays were already
                // discovered; request extended info for all of them now.
                let known: Vec<_> = state.wl_outputs.clone();
                for (id, output) in &known {
                    state.bind_extended(output, *id, qh);
                }
            }
        }
    }
}

impl Dispatch<wl_output::WlOutput, u32> for BootstrapState {
    fn event(
        state: &mut Self,
        _output: &wl_output::WlOutput,
        event: wl_output::Event,
        id: &u32,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let Some(event) = output_event_from_wl(event) {
            state.directory.apply(*id, event);
        }
    }
}

impl Dispatch<zxdg_output_manager_v1::ZxdgOutputManagerV1, ()> for BootstrapState {
    fn event(
        _state: &mut Self,
        _manager: &zxdg_output_manager_v1::ZxdgOutputManagerV1,
        _event: zxdg_output_manager_v1::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // The manager itself has no events.
    }
}

impl Dispatch<zxdg_output_v1::ZxdgOutputV1, u32> for BootstrapState {
    fn event(
        state: &mut Self,
        _xdg_output: &zxdg_output_v1::ZxdgOutputV1,
        event: zxdg_output_v1::Event,
        id: &u32,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let Some(event) = output_event_from_xdg(event) {
            state.directory.apply(*id, event);
        }
    }
}

fn output_event_from_wl(event: wl_output::Event) -> Option<OutputEvent> {
    match event {
        wl_output::Event::Geometry {
            physical_width,
            physical_height,
            subpixel,
            make,
            model,
            transform,
            ..
        } => Some(OutputEvent::Geometry {
            physical_width,
            physical_height,
            subpixel: subpixel_from_wire(subpixel),
            make,
            model,
            transform: transform_from_wire(transform),
        }),
        wl_output::Event::Mode {
            width,
            height,
            refresh,
            ..
        } => Some(OutputEvent::Mode {
            width,
            height,
            refresh_mhz: refresh,
        }),
        wl_output::Event::Scale { factor } => Some(OutputEvent::Scale { factor }),
        _ => None,
    }
}

fn output_event_from_xdg(event: zxdg_output_v1::Event) -> Option<OutputEvent> {
    match event {
        zxdg_output_v1::Event::LogicalPosition { x, y } => {
            Some(OutputEvent::LogicalPosition { x, y })
        }
        zxdg_output_v1::Event::LogicalSize { width, height } => {
            Some(OutputEvent::LogicalSize { width, height })
        }
        zxdg_output_v1::Event::Name { name } => Some(OutputEvent::Name(name)),
        zxdg_output_v1::Event::Description { description } => {
            Some(OutputEvent::Description(description))
        }
        _ => None,
    }
}

fn subpixel_from_wire(value: WEnum<wl_output::Subpixel>) -> Subpixel {
    match value {
        WEnum::Value(wl_output::Subpixel::None) => Subpixel::None,
        WEnum::Value(wl_output::Subpixel::HorizontalRgb) => Subpixel::HorizontalRgb,
        WEnum::Value(wl_output::Subpixel::HorizontalBgr) => Subpixel::HorizontalBgr,
        WEnum::Value(wl_output::Subpixel::VerticalRgb) => Subpixel::VerticalRgb,
        WEnum::Value(wl_output::Subpixel::VerticalBgr) => Subpixel::VerticalBgr,
        _ => Subpixel::Unknown,
    }
}

fn transform_from_wire(value: WEnum<wl_output::Transform>) -> Transform {
    match value {
        WEnum::Value(wl_output::Transform::_90) => Transform::Rotated90,
        WEnum::Value(wl_output::Transform::_180) => Transform::Rotated180,
        WEnum::Value(wl_output::Transform::_270) => Transform::Rotated270,
        WEnum::Value(wl_output::Transform::Flipped) => Transform::Flipped,
        WEnum::Value(wl_output::Transform::Flipped90) => Transform::Flipped90,
        WEnum::Value(wl_output::Transform::Flipped180) => Transform::Flipped180,
        WEnum::Value(wl_output::Transform::Flipped270) => Transform::Flipped270,
        _ => Transform::Normal,
    }
}
