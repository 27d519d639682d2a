//! Text encodings for reading sources and writing generated files.

use crate::error::{Error, Result};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

/// A character encoding selected by its WHATWG label (`UTF-8`, `ISO-8859-1`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Looks up an encoding by label, case-insensitively.
    ///
    /// # Errors
    /// * `Error::EncodingError` if the label is unknown
    pub fn from_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(TextEncoding)
            .ok_or_else(|| Error::EncodingError(label.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decodes bytes, letting a byte-order mark override the configured encoding.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.0.decode(bytes);
        text.into_owned()
    }

    /// Encodes text; encodings that cannot be produced (UTF-16) yield UTF-8.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, _) = self.0.encode(text);
        bytes.into_owned()
    }

    /// Reads the whole file at this encoding.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|source| Error::ReadError { path: path.to_path_buf(), source })?;
        Ok(self.decode(&bytes))
    }

    /// Writes `text` to `path` at this encoding, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P, text: &str) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.encode(text))
            .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
