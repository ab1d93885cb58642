//! Content normalization
//!
//! Converts an uploaded file (name + bytes) into one of a small set of typed
//! in-memory representations. Classification is keyed on the declared file
//! extension alone; the bytes are never sniffed to second-guess the name.

mod document;
mod image;
mod table;

pub use self::image::ImageContent;
pub use table::{CellValue, DataTable};

use bytes::Bytes;

use crate::types::AppResult;

/// An uploaded file as handed over by the HTTP layer. Consumed once by
/// [`normalize`]; never written to disk.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

/// The typed result of normalizing one upload.
#[derive(Debug, Clone)]
pub enum NormalizedContent {
    Table(DataTable),
    Text(String),
    Image(ImageContent),
    Unsupported,
}

impl NormalizedContent {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedContent::Table(_) => "table",
            NormalizedContent::Text(_) => "text",
            NormalizedContent::Image(_) => "image",
            NormalizedContent::Unsupported => "unsupported",
        }
    }
}

/// Classify `file` by its extension and run the matching parser.
///
/// The suffix match is case-sensitive. Parse failures come back as
/// `AppError::Normalization` with the parser's message and no partial result;
/// an unrecognized suffix is not an error but the `Unsupported` variant.
pub fn normalize(file: &UploadedFile) -> AppResult<NormalizedContent> {
    let name = file.name.as_str();

    if name.ends_with(".csv") {
        table::parse_csv(&file.bytes).map(NormalizedContent::Table)
    } else if name.ends_with(".xlsx") {
        table::parse_xlsx(&file.bytes).map(NormalizedContent::Table)
    } else if name.ends_with(".pdf") {
        document::extract_pdf(&file.bytes).map(NormalizedContent::Text)
    } else if name.ends_with(".docx") {
        document::extract_docx(&file.bytes).map(NormalizedContent::Text)
    } else if name.ends_with(".pptx") {
        document::extract_pptx(&file.bytes).map(NormalizedContent::Text)
    } else if name.ends_with(".png") || name.ends_with(".jpg") || name.ends_with(".jpeg") {
        self::image::decode(&file.bytes).map(NormalizedContent::Image)
    } else {
        Ok(NormalizedContent::Unsupported)
    }
}
