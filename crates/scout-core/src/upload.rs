//! Mission geometry selection.

use serde::{Deserialize, Serialize};

pub const KML_EXTENSION: &str = ".kml";

/// A candidate geometry file held in memory until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl KmlFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }

    pub fn is_kml(&self) -> bool {
        self.name.ends_with(KML_EXTENSION)
    }
}

/// How the operator picked the files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    /// File picker: accepted as-is.
    #[default]
    Picker,
    /// Drop target: only `.kml` names survive.
    Drop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    files: Vec<KmlFile>,
    source: SelectionSource,
}

impl UploadBatch {
    pub fn from_picker(files: Vec<KmlFile>) -> Self {
        Self {
            files,
            source: SelectionSource::Picker,
        }
    }

    pub fn from_drop(files: Vec<KmlFile>) -> Self {
        Self {
            files: files.into_iter().filter(KmlFile::is_kml).collect(),
            source: SelectionSource::Drop,
        }
    }

    pub fn files(&self) -> &[KmlFile] {
        &self.files
    }

    pub fn source(&self) -> SelectionSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Status line shown under the drop zone after a selection.
    pub fn selection_message(&self) -> String {
        match (self.source, self.files.len()) {
            (SelectionSource::Picker, 0) => String::new(),
            (SelectionSource::Picker, n) => format!("{} file(s) selected.", n),
            (SelectionSource::Drop, 0) => "No KML files dropped.".to_string(),
            (SelectionSource::Drop, n) => format!("{} KML file(s) selected.", n),
        }
    }
}
