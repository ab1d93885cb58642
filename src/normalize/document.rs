//! Text extraction from paged/structured documents (PDF, DOCX, PPTX)
//!
//! Each extractor concatenates text in source order with newline separators:
//! page order for PDF, paragraph order for DOCX, slide order for PPTX.

use std::io::{Cursor, Read};

use docx_rust::document::{BodyContent, ParagraphContent, RunContent};
use docx_rust::DocxFile;
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;

use crate::types::{AppError, AppResult};

pub fn extract_pdf(bytes: &[u8]) -> AppResult<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::Normalization(format!("failed to open PDF: {}", e)))?;

    // get_pages is keyed by page number, so iteration is page order
    let mut pages = Vec::new();
    for (&number, _) in doc.get_pages().iter() {
        let text = doc.extract_text(&[number]).map_err(|e| {
            AppError::Normalization(format!(
                "failed to extract text from PDF page {}: {}",
                number, e
            ))
        })?;
        pages.push(text.trim_end().to_string());
    }

    Ok(pages.join("\n"))
}

pub fn extract_docx(bytes: &[u8]) -> AppResult<String> {
    let docx_file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|e| AppError::Normalization(format!("failed to open DOCX: {}", e)))?;
    let docx = docx_file
        .parse()
        .map_err(|e| AppError::Normalization(format!("failed to parse DOCX: {}", e)))?;

    let mut paragraphs = Vec::new();
    for content in &docx.document.body.content {
        if let BodyContent::Paragraph(paragraph) = content {
            let mut text = String::new();
            for para_content in &paragraph.content {
                if let ParagraphContent::Run(run) = para_content {
                    for run_content in &run.content {
                        if let RunContent::Text(t) = run_content {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs.join("\n"))
}

pub fn extract_pptx(bytes: &[u8]) -> AppResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Normalization(format!("failed to open PPTX archive: {}", e)))?;

    // slide parts carry no order inside the archive; sort by slide number so
    // slide2 precedes slide10
    let mut slide_parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_parts.sort();

    if slide_parts.is_empty() {
        return Err(AppError::Normalization(
            "no slides found in presentation".to_string(),
        ));
    }

    let mut slides = Vec::new();
    for (_, name) in &slide_parts {
        let mut xml = String::new();
        archive
            .by_name(name)
            .map_err(|e| AppError::Normalization(format!("failed to read {}: {}", name, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| AppError::Normalization(format!("failed to read {}: {}", name, e)))?;
        slides.push(slide_text(&xml)?);
    }

    Ok(slides.join("\n"))
}

fn slide_number(part_name: &str) -> Option<u32> {
    part_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Collect the text runs of one slide in document order. Text lives in
/// `<a:t>` elements; the end of a paragraph becomes a newline so shape text
/// keeps its line structure.
fn slide_text(xml: &str) -> AppResult<String> {
    let mut reader = XmlReader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"a:t" => in_run = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"a:t" => in_run = false,
                b"a:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let run = t
                    .unescape()
                    .map_err(|e| AppError::Normalization(format!("invalid slide XML: {}", e)))?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Normalization(format!("invalid slide XML: {}", e)));
            }
        }
    }

    Ok(text.trim_end().to_string())
}
