// src/outputs.rs

//! In-memory registry of the displays advertised by the compositor.
//!
//! Descriptors are populated incrementally by [`OutputEvent`]s: the wire
//! listener translates protocol events into this enum and feeds them through
//! [`DisplayDescriptor::apply`], so the whole state machine can be exercised
//! with synthetic events and no live connection.

use std::collections::HashMap;

use crate::errors::{Result, WaybridgeError};

/// Subpixel layout of a display panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subpixel {
    #[default]
    Unknown,
    None,
    HorizontalRgb,
    HorizontalBgr,
    VerticalRgb,
    VerticalBgr,
}

/// Rotation/flip applied to a display's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
    Flipped,
    Flipped90,
    Flipped180,
    Flipped270,
}

/// How much of a display's state has been learned so far.
///
/// - `Discovered`: the object was bound from the registry.
/// - `GeometryKnown`: basic geometry/mode/scale events have been applied.
/// - `ExtendedKnown`: extended position/size/name/description events applied.
/// - `Ready`: both synchronization barriers have completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputPhase {
    #[default]
    Discovered,
    GeometryKnown,
    ExtendedKnown,
    Ready,
}

/// One display advertised by the compositor.
///
/// Extended fields (name, description, logical position/size) stay at their
/// zero defaults when the compositor never advertises extended output info;
/// that is not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayDescriptor {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub physical_width: i32,
    pub physical_height: i32,
    pub subpixel: Subpixel,
    pub transform: Transform,
    pub scale: i32,
    pub refresh: f32,
    pub phase: OutputPhase,
}

/// An inbound protocol event that mutates one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Geometry {
        physical_width: i32,
        physical_height: i32,
        subpixel: Subpixel,
        make: String,
        model: String,
        transform: Transform,
    },
    Mode {
        width: i32,
        height: i32,
        refresh_mhz: i32,
    },
    Scale {
        factor: i32,
    },
    LogicalPosition {
        x: i32,
        y: i32,
    },
    LogicalSize {
        width: i32,
        height: i32,
    },
    Name(String),
    Description(String),
}

impl DisplayDescriptor {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Apply one inbound event.
    ///
    /// Basic events advance the phase to `GeometryKnown`, extended events to
    /// `ExtendedKnown`; the directory flips everything to `Ready` once the
    /// second barrier completes. Logical size arrives after the mode size and
    /// overwrites it.
    pub fn apply(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::Geometry {
                physical_width,
                physical_height,
                subpixel,
                make,
                model,
                transform,
            } => {
                self.physical_width = physical_width;
                self.physical_height = physical_height;
                self.subpixel = subpixel;
                self.make = make;
                self.model = model;
                self.transform = transform;
                self.advance(OutputPhase::GeometryKnown);
            }
            OutputEvent::Mode {
                width,
                height,
                refresh_mhz,
            } => {
                self.width = width;
                self.height = height;
                self.refresh = refresh_mhz as f32 / 1000.0;
                self.advance(OutputPhase::GeometryKnown);
            }
            OutputEvent::Scale { factor } => {
                self.scale = factor;
                self.advance(OutputPhase::GeometryKnown);
            }
            OutputEvent::LogicalPosition { x, y } => {
                self.x = x;
                self.y = y;
                self.advance(OutputPhase::ExtendedKnown);
            }
            OutputEvent::LogicalSize { width, height } => {
                self.width = width;
                self.height = height;
                self.advance(OutputPhase::ExtendedKnown);
            }
            OutputEvent::Name(name) => {
                self.name = name;
                self.advance(OutputPhase::ExtendedKnown);
            }
            OutputEvent::Description(description) => {
                self.description = description;
                self.advance(OutputPhase::ExtendedKnown);
            }
        }
    }

    /// `"<width>x<height>"`, the geometry token handed to the X server.
    pub fn geometry(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// `"<make> <model>"`, matched against the selection override label.
    pub fn make_model(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    fn advance(&mut self, phase: OutputPhase) {
        self.phase = self.phase.max(phase);
    }
}

/// Insertion-ordered mapping from registry identity to descriptor.
///
/// Registration order matters: the first registered display is the
/// provisional default, and override selection scans in that order.
#[derive(Debug, Default)]
pub struct OutputDirectory {
    order: Vec<u32>,
    outputs: HashMap<u32, DisplayDescriptor>,
    selected: Option<u32>,
}

impl OutputDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly discovered display. The first registration becomes the
    /// provisional default; re-registering an identity is a no-op.
    pub fn register(&mut self, id: u32) {
        if self.outputs.contains_key(&id) {
            return;
        }
        self.order.push(id);
        self.outputs.insert(id, DisplayDescriptor::new(id));
        if self.selected.is_none() {
            self.selected = Some(id);
        }
    }

    /// Route an event to the descriptor it belongs to. Events for unknown
    /// identities are dropped.
    pub fn apply(&mut self, id: u32, event: OutputEvent) {
        if let Some(descriptor) = self.outputs.get_mut(&id) {
            descriptor.apply(event);
        }
    }

    /// Re-select the default display from an override label.
    ///
    /// Scans in registration order for a make match or a `"make model"`
    /// match; the first match wins. An unmatched label leaves the default
    /// unchanged.
    pub fn select(&mut self, label: &str) {
        for id in &self.order {
            let descriptor = &self.outputs[id];
            if descriptor.make == label || descriptor.make_model() == label {
                self.selected = Some(*id);
                return;
            }
        }
    }

    /// Flip every descriptor to `Ready` once the second barrier completes.
    pub fn mark_ready(&mut self) {
        for descriptor in self.outputs.values_mut() {
            descriptor.phase = OutputPhase::Ready;
        }
    }

    /// The display the session will use.
    ///
    /// Fails when nothing was ever registered, i.e. the compositor advertised
    /// zero displays.
    pub fn finalize(&self) -> Result<&DisplayDescriptor> {
        self.selected
            .and_then(|id| self.outputs.get(&id))
            .ok_or_else(|| {
                WaybridgeError::Protocol("no displays advertised by the compositor".to_string())
            })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DisplayDescriptor> {
        self.order.iter().filter_map(|id| self.outputs.get(id))
    }
}
