//! Field extraction from protocol first-page text.
//!
//! Protocol pages print each value on the line directly above its label:
//!
//! ```text
//! 3
//! Slot
//! ACME-7<rack 2>
//! Customer unit ID
//! SN-40112
//! Serial number
//! ```
//!
//! The parser walks the lines once per label and picks up the line above.
//! Phase markers are matched anywhere on the page.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::io::TextExtractor;

const SERIAL_NUMBER_LABEL: &str = "Serial number";
const SYSTEM_SN_LABEL: &str = "System SN";
const SLOT_LABEL: &str = "Slot";
const UNIT_ID_LABEL: &str = "Customer unit ID";

/// Measurement phase a protocol covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Measured before adjustment.
    AsFound,
    /// Measured after adjustment.
    AsLeft,
    /// Combined before/after report.
    FoundLeft,
}

impl Phase {
    /// Marker searched for in page text (compared case-insensitively).
    pub fn marker(&self) -> &'static str {
        match self {
            Self::AsFound => "as-found",
            Self::AsLeft => "as-left",
            Self::FoundLeft => "found-left",
        }
    }

    /// Suffix appended to canonical file names.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::AsFound => "_As-found",
            Self::AsLeft => "_As-left",
            Self::FoundLeft => "_Found-left",
        }
    }
}

/// Fields extracted from a protocol's first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFields {
    /// Slot position; 0 when unknown.
    pub slot: i64,
    /// Page mentions `as-found`.
    pub as_found: bool,
    /// Page mentions `as-left`.
    pub as_left: bool,
    /// Page mentions `found-left`.
    pub found_left: bool,
    /// Customer unit id, possibly empty.
    pub unit_id: String,
    /// Serial number (or System SN when present), possibly empty.
    pub serial_number: String,
}

impl ParsedFields {
    /// Parse first-page text.
    pub fn parse(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut fields = Self {
            as_found: lowered.contains(Phase::AsFound.marker()),
            as_left: lowered.contains(Phase::AsLeft.marker()),
            found_left: lowered.contains(Phase::FoundLeft.marker()),
            ..Self::default()
        };

        let lines: Vec<&str> = text.lines().collect();

        if let Some(serial) = value_above_first(&lines, SERIAL_NUMBER_LABEL) {
            fields.serial_number = serial.to_string();
        }

        for (above, line) in lines.iter().zip(lines.iter().skip(1)) {
            if line.contains(SLOT_LABEL) {
                if let Ok(slot) = above.trim().parse::<i64>() {
                    fields.slot = slot;
                }
            }

            if line.contains(UNIT_ID_LABEL) {
                fields.unit_id = above.to_string();
            }

            if line.contains(SYSTEM_SN_LABEL) {
                fields.serial_number = above.to_string();
            }
        }

        fields
    }

    /// The single phase this protocol is filed under.
    ///
    /// Pages can mention several markers; `as-found` beats `as-left`, which
    /// beats `found-left`.
    pub fn phase(&self) -> Option<Phase> {
        if self.as_found {
            Some(Phase::AsFound)
        } else if self.as_left {
            Some(Phase::AsLeft)
        } else if self.found_left {
            Some(Phase::FoundLeft)
        } else {
            None
        }
    }
}

fn value_above_first<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines
        .windows(2)
        .find(|pair| pair[1].contains(label))
        .map(|pair| pair[0])
}

/// Outcome of parsing a PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text was read and parsed.
    Parsed(ParsedFields),
    /// Text could not be read; `fields` are all defaults.
    Fallback {
        /// Default fields.
        fields: ParsedFields,
        /// Why extraction failed.
        reason: String,
    },
}

impl Extraction {
    /// Fields to act on, whichever way extraction went.
    pub fn fields(&self) -> &ParsedFields {
        match self {
            Self::Parsed(fields) | Self::Fallback { fields, .. } => fields,
        }
    }

    /// Take ownership of the fields.
    pub fn into_fields(self) -> ParsedFields {
        match self {
            Self::Parsed(fields) | Self::Fallback { fields, .. } => fields,
        }
    }

    /// Whether extraction failed and defaults are in use.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Read and parse the first page of `path`.
///
/// Never fails: unreadable files yield [`Extraction::Fallback`].
pub fn parse_file(extractor: &impl TextExtractor, path: &Path) -> Extraction {
    match extractor.first_page_text(path) {
        Ok(text) => Extraction::Parsed(ParsedFields::parse(&text)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default protocol fields");
            Extraction::Fallback {
                fields: ParsedFields::default(),
                reason: err.to_string(),
            }
        }
    }
}
