//! Integration test helpers for protosort.
//!
//! Protocol PDFs are generated on the fly with `lopdf`, laid out like the
//! real protocols: every value sits on the line above its label.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// First-page contents of a generated protocol.
#[derive(Debug, Clone, Default)]
pub struct Protocol {
    title: String,
    phase: Option<String>,
    slot: Option<i64>,
    unit_id: Option<String>,
    serial: Option<String>,
    system_sn: Option<String>,
    extra_pages: Vec<String>,
    single_text_object: bool,
}

impl Protocol {
    /// Start a protocol whose first line is `title`.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// A Sirius protocol.
    pub fn sirius() -> Self {
        Self::new("Sirius calibration protocol")
    }

    /// A protocol of another product family.
    pub fn generic() -> Self {
        Self::new("Module calibration protocol")
    }

    pub fn phase(mut self, marker: &str) -> Self {
        self.phase = Some(marker.to_string());
        self
    }

    pub fn slot(mut self, slot: i64) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn unit(mut self, unit_id: &str) -> Self {
        self.unit_id = Some(unit_id.to_string());
        self
    }

    pub fn serial(mut self, serial: &str) -> Self {
        self.serial = Some(serial.to_string());
        self
    }

    pub fn system_sn(mut self, serial: &str) -> Self {
        self.system_sn = Some(serial.to_string());
        self
    }

    /// Lay the first page out as one text object, moving down a line with
    /// `T*`, `Td`, `'` and `"` the way report generators do.
    pub fn single_text_object(mut self) -> Self {
        self.single_text_object = true;
        self
    }

    /// Append a page carrying a single line of text.
    pub fn page(mut self, text: &str) -> Self {
        self.extra_pages.push(text.to_string());
        self
    }

    fn first_page_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];

        if let Some(phase) = &self.phase {
            lines.push(format!("Measurement {phase}"));
        }
        if let Some(slot) = self.slot {
            lines.push(slot.to_string());
            lines.push("Slot".to_string());
        }
        if let Some(unit_id) = &self.unit_id {
            lines.push(unit_id.clone());
            lines.push("Customer unit ID".to_string());
        }
        if let Some(serial) = &self.serial {
            lines.push(serial.clone());
            lines.push("Serial number".to_string());
        }
        if let Some(system_sn) = &self.system_sn {
            lines.push(system_sn.clone());
            lines.push("System SN".to_string());
        }

        lines
    }

    /// Write the protocol to `dir/name`.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let first = self.first_page_lines();
        let mut pages = vec![if self.single_text_object {
            text_block(&first)
        } else {
            text_lines(&first)
        }];
        pages.extend(
            self.extra_pages
                .iter()
                .map(|text| text_lines(std::slice::from_ref(text))),
        );

        let path = dir.join(name);
        write_pdf(&path, pages);
        path
    }
}

/// One text object per line.
fn text_lines(lines: &[String]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let y = 760 - 16 * idx as i64;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
        operations.push(Operation::new("Td", vec![40.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// All lines in a single text object.
fn text_block(lines: &[String]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 11.into()]),
        Operation::new("TL", vec![16.into()]),
        Operation::new("Td", vec![40.into(), 760.into()]),
    ];
    for (idx, line) in lines.iter().enumerate() {
        let text = Object::string_literal(line.as_str());
        if idx == 0 {
            operations.push(Operation::new("Tj", vec![text]));
            continue;
        }
        match idx % 4 {
            0 => {
                operations.push(Operation::new("T*", vec![]));
                operations.push(Operation::new("Tj", vec![text]));
            }
            1 => {
                operations.push(Operation::new("TD", vec![0.into(), (-16).into()]));
                operations.push(Operation::new("Tj", vec![text]));
            }
            2 => operations.push(Operation::new("'", vec![text])),
            _ => operations.push(Operation::new("\"", vec![0.into(), 0.into(), text])),
        }
    }
    operations.push(Operation::new("ET", vec![]));
    operations
}

/// Write a PDF with one page per operation list.
pub fn write_pdf(path: &Path, pages: Vec<Vec<Operation>>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to write test PDF");
}

/// Text of every page of a PDF, in page order.
pub fn page_texts(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .keys()
        .map(|page| doc.extract_text(&[*page]).expect("Failed to extract text"))
        .collect()
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| {
            entry
                .expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Batch folder that is removed when dropped.
pub fn batch_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp dir")
}
