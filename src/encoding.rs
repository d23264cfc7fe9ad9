/*!
 * Text decoding with a fixed fallback chain
 */

use std::fs;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use encoding_rs::{Encoding, GBK, UTF_16BE, UTF_16LE};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

/// Encodings tried, in order, when reading a file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ValueEnum, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// UTF-8, with an optional byte order mark
    Utf8,
    /// UTF-16, only when a byte order mark is present
    Utf16,
    /// GBK, common in projects written in Chinese
    Gbk,
    /// ISO-8859-1; accepts any byte sequence
    Latin1,
}

/// Default fallback order
pub const DEFAULT_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Gbk,
    TextEncoding::Latin1,
];

impl TextEncoding {
    /// Decode `bytes`, or `None` if they are not valid in this encoding
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_string)
            }
            TextEncoding::Utf16 => match Encoding::for_bom(bytes) {
                Some((encoding, bom_len)) if encoding == UTF_16LE || encoding == UTF_16BE => {
                    strict_decode(encoding, &bytes[bom_len..])
                }
                _ => None,
            },
            TextEncoding::Gbk => strict_decode(GBK, bytes),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

// Malformed input is a failure, never replacement characters
fn strict_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Result of reading one file for the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Decoded text
    Text(String),
    /// The path is gone or not a regular file
    NotFound,
    /// The read failed or no encoding in the chain accepted the bytes
    Undecodable,
}

/// Read a whole file and decode it with the first encoding that accepts it
pub fn read_text(path: &Path, chain: &[TextEncoding]) -> FileContent {
    if !path.is_file() {
        return FileContent::NotFound;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return FileContent::NotFound,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return FileContent::Undecodable;
        }
    };

    for encoding in chain {
        if let Some(text) = encoding.decode(&bytes) {
            debug!("Decoded {} as {}", path.display(), encoding);
            return FileContent::Text(text);
        }
    }

    warn!(
        "No encoding in [{}] could decode {}",
        chain
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        path.display()
    );
    FileContent::Undecodable
}
