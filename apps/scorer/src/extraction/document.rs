//! Text Extractor — decodes uploaded PDF / DOCX / plain-text bytes into text.
//!
//! PDF goes through two backends: `pdftotext -layout` first (layout-aware, needs
//! poppler on the host), then `pdf-extract` in-process. DOCX is read straight
//! out of the OOXML archive. Decoding failures are fatal; there is no partial
//! document.

use std::io::{Cursor, Read};
use std::process::Command;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::normalize::normalize_text;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const PDFTOTEXT_BIN: &str = "pdftotext";
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {format} document: {source}")]
    ExtractionFailure {
        format: DocumentFormat,
        #[source]
        source: BoxError,
    },
}

impl ExtractionError {
    fn failure(format: DocumentFormat, source: impl Into<BoxError>) -> Self {
        ExtractionError::ExtractionFailure {
            format,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let lower = filename.to_lowercase();
        let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match extension {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
            DocumentFormat::Txt => ".txt",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension()[1..])
    }
}

/// Decodes and normalizes a document.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = extract_raw(bytes, format)?;
    Ok(normalize_text(&text))
}

/// Decodes a document without normalizing it.
pub fn extract_raw(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => {
            extract_docx(bytes).map_err(|e| ExtractionError::failure(format, e))
        }
        DocumentFormat::Txt => String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractionError::failure(format, e)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PDF
// ────────────────────────────────────────────────────────────────────────────

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    match extract_pdf_layout(bytes) {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => debug!("Layout-aware PDF backend produced no text, trying plain backend"),
        Err(e) => warn!("Layout-aware PDF backend failed: {e}, trying plain backend"),
    }

    extract_pdf_plain(bytes).map_err(|e| {
        warn!("Plain PDF backend failed: {e}");
        ExtractionError::failure(DocumentFormat::Pdf, e)
    })
}

/// Runs `pdftotext -layout` on a temporary copy of the document.
fn extract_pdf_layout(bytes: &[u8]) -> Result<String, BoxError> {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("input.pdf");
    std::fs::write(&input_path, bytes)?;

    let output = Command::new(PDFTOTEXT_BIN)
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(&input_path)
        .arg("-")
        .output()?;

    if !output.status.success() {
        return Err(format!(
            "{PDFTOTEXT_BIN} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )
        .into());
    }

    Ok(String::from_utf8(output.stdout)?)
}

fn extract_pdf_plain(bytes: &[u8]) -> Result<String, BoxError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("pdf-extract: {e}").into()),
        Err(_) => Err("pdf-extract panicked while decoding the document".into()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

static XML_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
static NUMERIC_ENTITY_RE: OnceLock<Regex> = OnceLock::new();

fn extract_docx(bytes: &[u8]) -> Result<String, BoxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY_PART)?.read_to_string(&mut xml)?;
    Ok(docx_paragraph_text(&xml))
}

/// Walks the body part tag by tag and emits one line per closed `<w:p>`, in
/// document order. Paragraphs nested in text boxes (`<w:txbx>`) end their own
/// line without dropping the rest of the enclosing paragraph.
fn docx_paragraph_text(xml: &str) -> String {
    // groups: 1 CDATA body, 2 closing slash, 3 tag name, 4 self-closing slash, 5 character data
    let token_re = XML_TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"(?s)<!\[CDATA\[(.*?)\]\]>|<!--.*?-->|<[?!][^>]*>|<(/?)([A-Za-z_][\w:.\-]*)(?:\s[^>]*?)?(/?)>|([^<]+)",
        )
        .expect("xml token regex")
    });

    let mut text = String::new();
    let mut in_text = false;
    let mut in_tab_stops = false;
    for token in token_re.captures_iter(xml) {
        if let Some(cdata) = token.get(1) {
            if in_text {
                text.push_str(cdata.as_str());
            }
            continue;
        }
        if let Some(chars) = token.get(5) {
            if in_text {
                text.push_str(&unescape_xml(chars.as_str()));
            }
            continue;
        }
        // comments, processing instructions, doctype
        let Some(name) = token.get(3) else {
            continue;
        };
        let closing = !token[2].is_empty();
        let self_closing = !token[4].is_empty();

        match name.as_str() {
            "w:t" => in_text = !closing && !self_closing,
            // tab stop definitions in paragraph properties share the tag name
            "w:tabs" => in_tab_stops = !closing && !self_closing,
            "w:tab" if !closing && !in_tab_stops => text.push('\t'),
            "w:br" | "w:cr" if !closing => text.push('\n'),
            "w:p" if closing || self_closing => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn unescape_xml(s: &str) -> String {
    let numeric_re = NUMERIC_ENTITY_RE
        .get_or_init(|| Regex::new(r"&#(x?)([0-9A-Fa-f]+);").expect("xml entity regex"));
    let decoded = numeric_re.replace_all(s, |caps: &Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
