//! Program image files.
//!
//! Programs arrive already encoded. Two file layouts are accepted:
//! - Binary: a flat sequence of 16-bit words, big-endian unless told
//!   otherwise (the layout most DCPU-16 assemblers emit)
//! - Hex dump: whitespace-separated hex words, optional `0x` prefix,
//!   `;` starts a comment that runs to the end of the line
//!
//! Files ending in `.hex` or `.txt` are read as hex dumps, anything else as
//! binary.

use crate::word::Word;
use std::path::Path;
use thiserror::Error;

/// Byte order of a binary image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// Decode a binary image.
pub fn parse_binary(bytes: &[u8], order: ByteOrder) -> Result<Vec<Word>, ImageError> {
    if bytes.len() % 2 != 0 {
        return Err(ImageError::OddLength(bytes.len()));
    }

    let words = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            match order {
                ByteOrder::BigEndian => Word::from_be_bytes(pair),
                ByteOrder::LittleEndian => Word::from_le_bytes(pair),
            }
        })
        .collect();
    Ok(words)
}

/// Decode a hex dump.
pub fn parse_hex(text: &str) -> Result<Vec<Word>, ImageError> {
    let mut words = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let code = line.split(';').next().unwrap_or_default();
        for token in code.split_whitespace() {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let word = Word::from_str_radix(digits, 16).map_err(|_| ImageError::Parse {
                line: line_num + 1,
                token: token.to_string(),
            })?;
            words.push(word);
        }
    }

    Ok(words)
}

/// Load an image from disk, picking the layout from the file extension.
pub fn load_image<P: AsRef<Path>>(path: P, order: ByteOrder) -> Result<Vec<Word>, ImageError> {
    let path = path.as_ref();
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("hex") || ext.eq_ignore_ascii_case("txt"));

    if is_text {
        parse_hex(&std::fs::read_to_string(path)?)
    } else {
        parse_binary(&std::fs::read(path)?, order)
    }
}

/// Errors that can occur while reading a program image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary image has odd length {0}")]
    OddLength(usize),

    #[error("line {line}: invalid hex word '{token}'")]
    Parse { line: usize, token: String },
}
