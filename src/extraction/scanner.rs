/*!
 * Declaration scanner.
 *
 * Finds `t({...})` declarations in arbitrary source text without parsing the
 * host language. Each match must be preceded by a boundary byte so that
 * identifiers such as `text({` or `gettext({` are skipped. The body is decoded
 * with a streaming JSON decoder that stops after exactly one value, which
 * leaves any trailing call arguments untouched.
 */

use log::debug;
use serde_json::Deserializer;

use super::entry::{Entry, RawDeclaration};
use crate::errors::ScanError;

/// Opening marker of a declaration: call plus object brace
const MARKER: &[u8] = b"t({";

/// Maximum number of characters echoed back in decode errors
const PREVIEW_CHARS: usize = 300;

/// Scans text buffers for translation declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationScanner;

impl DeclarationScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self
    }

    /// Extract every declaration in `data`, in byte order.
    ///
    /// `file` is only used to label entry locations and errors.
    pub fn scan(&self, file: &str, data: &[u8]) -> Result<Vec<Entry>, ScanError> {
        let mut entries = Vec::new();
        let mut cursor = 0;
        let mut lines = LineCounter::default();

        while cursor < data.len() {
            let Some(found) = find_marker(&data[cursor..]) else {
                break;
            };
            let start = cursor + found;

            if start > 0 && !is_boundary(data[start - 1]) {
                cursor = start + 1;
                continue;
            }

            // Decode from the object brace of the marker
            let body_start = start + MARKER.len() - 1;
            let body = &data[body_start..];
            let line = lines.line_at(data, start);
            let location = format!("{}:{}", file, line);

            let mut stream = Deserializer::from_slice(body).into_iter::<RawDeclaration>();
            let Some(decoded) = stream.next() else {
                break;
            };
            let raw = decoded.map_err(|source| ScanError::Decode {
                location: location.clone(),
                source,
                preview: preview(body),
            })?;

            debug!("Found declaration '{}' at {}", raw.code, location);
            entries.push(Entry::from_raw(location, raw));

            cursor = body_start + stream.byte_offset();
        }

        Ok(entries)
    }
}

/// Convenience wrapper around `DeclarationScanner::scan`
pub fn extract_from_content(file: &str, data: &[u8]) -> Result<Vec<Entry>, ScanError> {
    DeclarationScanner::new().scan(file, data)
}

/// Bytes that may legally precede a declaration
pub fn is_boundary(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'.' | b'{')
}

fn find_marker(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(MARKER.len())
        .position(|window| window == MARKER)
}

/// Incremental 1-based line lookup for increasing offsets
#[derive(Debug, Clone, Copy)]
struct LineCounter {
    offset: usize,
    line: usize,
}

impl Default for LineCounter {
    fn default() -> Self {
        Self { offset: 0, line: 1 }
    }
}

impl LineCounter {
    /// Line of the byte at `index`; only the bytes since the previous call are counted
    fn line_at(&mut self, data: &[u8], index: usize) -> usize {
        let index = index.min(data.len());
        if index < self.offset {
            *self = Self::default();
        }
        self.line += data[self.offset..index].iter().filter(|&&b| b == b'\n').count();
        self.offset = index;
        self.line
    }
}

fn preview(body: &[u8]) -> String {
    // A UTF-8 char is at most 4 bytes; one extra char decides the ellipsis
    let window = &body[..body.len().min((PREVIEW_CHARS + 1) * 4)];
    let text = String::from_utf8_lossy(window);
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
