//! WinAnsi encoding utilities for the built-in PDF fonts
//!
//! The standard 14 fonts only cover the WinAnsi (windows-1252) repertoire.
//! This module provides utilities for:
//! - Converting UTF-8 text to WinAnsi bytes (unmappable characters become `?`)
//! - Escaping bytes for PDF literal strings

use tracing::instrument;

/// Convert a UTF-8 string to WinAnsi bytes
///
/// `encoding_rs` replaces unmappable characters with HTML numeric character
/// references, so each character is encoded on its own and failures are
/// replaced with `?` instead.
#[instrument(skip_all)]
pub fn encode_winansi(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors || cow.len() != 1 {
            out.push(b'?');
        } else {
            out.extend_from_slice(&cow);
        }
    }
    out
}

/// Escape bytes for use inside a PDF literal string `( ... )`
///
/// Backslash and both parentheses are escaped; CR/LF are written as escape
/// sequences so a line break in the data never splits the content stream.
pub fn escape_pdf_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 8);
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            _ => out.push(b),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode_winansi("Table T5"), b"Table T5".to_vec());
    }

    #[test]
    fn test_latin1_and_cp1252_extras() {
        // é is 0xE9, € is 0x80 in windows-1252
        assert_eq!(encode_winansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_winansi("€5"), vec![0x80, b'5']);
    }

    #[test]
    fn test_unmappable_becomes_question_mark() {
        assert_eq!(encode_winansi("₹450"), b"?450".to_vec());
        assert_eq!(encode_winansi("🌊 Sea"), b"? Sea".to_vec());
        assert_eq!(encode_winansi("宫保"), b"??".to_vec());
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(
            escape_pdf_string(b"Fish (large) \\ chips"),
            b"Fish \\(large\\) \\\\ chips".to_vec()
        );
        assert_eq!(escape_pdf_string(b"a\nb"), b"a\\nb".to_vec());
    }
}
