//! Clipboard collaborator and the JSON boundary around [`ClipboardData`].
//!
//! Parsing fails closed: anything that does not decode into a payload of the
//! expected kind with events of that kind is an error, and callers paste nothing.

use tickroll_types::{ClipboardData, ClipboardKind};

use crate::error::ClipboardError;

/// Text clipboard provided by the host.
pub trait ClipboardIo {
    fn write_text(&mut self, text: String);
    fn read_text(&self) -> Option<String>;
}

/// In-process clipboard for hosts without a system clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardIo for MemoryClipboard {
    fn write_text(&mut self, text: String) {
        self.text = Some(text);
    }

    fn read_text(&self) -> Option<String> {
        self.text.clone()
    }
}

pub fn serialize(data: &ClipboardData) -> Result<String, ClipboardError> {
    Ok(serde_json::to_string(data)?)
}

/// Decode and validate a payload of kind `expected`.
pub fn parse(text: &str, expected: ClipboardKind) -> Result<ClipboardData, ClipboardError> {
    if text.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }
    let data: ClipboardData = serde_json::from_str(text)?;
    if data.kind != expected {
        return Err(ClipboardError::TagMismatch {
            expected,
            found: data.kind,
        });
    }
    data.validate().map_err(ClipboardError::Schema)?;
    Ok(data)
}

pub fn write(io: &mut dyn ClipboardIo, data: &ClipboardData) -> Result<(), ClipboardError> {
    io.write_text(serialize(data)?);
    Ok(())
}

pub fn read(io: &dyn ClipboardIo, expected: ClipboardKind) -> Result<ClipboardData, ClipboardError> {
    let text = io.read_text().ok_or(ClipboardError::Empty)?;
    parse(&text, expected)
}
