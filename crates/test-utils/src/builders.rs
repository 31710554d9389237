#![allow(dead_code)]

use waybridge::outputs::{OutputDirectory, OutputEvent, Subpixel, Transform};

/// Builder for an `OutputDirectory` populated with synthetic displays.
pub struct OutputDirectoryBuilder {
    directory: OutputDirectory,
    next_id: u32,
}

impl OutputDirectoryBuilder {
    pub fn new() -> Self {
        Self {
            directory: OutputDirectory::new(),
            next_id: 1,
        }
    }

    /// Register a display and feed it the basic event sequence a compositor
    /// sends: geometry, then current mode, then scale.
    pub fn with_output(mut self, make: &str, model: &str, width: i32, height: i32) -> Self {
        let id = self.next_id;
        self.next_id += 1;
        self.directory.register(id);
        for event in basic_output_events(make, model, width, height) {
            self.directory.apply(id, event);
        }
        self
    }

    pub fn build(mut self) -> OutputDirectory {
        self.directory.mark_ready();
        self.directory
    }
}

impl Default for OutputDirectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The basic (pre-extended-info) event sequence for one display.
pub fn basic_output_events(make: &str, model: &str, width: i32, height: i32) -> Vec<OutputEvent> {
    vec![
        OutputEvent::Geometry {
            physical_width: 600,
            physical_height: 340,
            subpixel: Subpixel::HorizontalRgb,
            make: make.to_string(),
            model: model.to_string(),
            transform: Transform::Normal,
        },
        OutputEvent::Mode {
            width,
            height,
            refresh_mhz: 60_000,
        },
        OutputEvent::Scale { factor: 1 },
    ]
}

/// The extended-info event sequence for one display.
pub fn extended_output_events(
    name: &str,
    description: &str,
    width: i32,
    height: i32,
) -> Vec<OutputEvent> {
    vec![
        OutputEvent::LogicalPosition { x: 0, y: 0 },
        OutputEvent::LogicalSize { width, height },
        OutputEvent::Name(name.to_string()),
        OutputEvent::Description(description.to_string()),
    ]
}
