//! `data:` URLs, the currency of the picker, the export and the downloader.

use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use thiserror::Error;

/// Errors from parsing a data URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingScheme,

    #[error("data URL has no ',' separator")]
    MissingSeparator,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type, `text/plain` when omitted.
    pub mime: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Parse `data:[<mime>][;param...][;base64],<payload>`.
    pub fn parse(url: &str) -> Result<Self, DataUrlError> {
        let rest = url
            .trim_start()
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingSeparator)?;

        let mut params = header.split(';');
        let mime = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("text/plain")
            .to_ascii_lowercase();
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            // Browsers tolerate whitespace inside the payload
            let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?
        } else {
            percent_decode(payload)
        };

        Ok(Self { mime, data })
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
