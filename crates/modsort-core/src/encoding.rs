//! Text decoding for archive names and catalog pages.
//!
//! Names are tried as UTF-8, then as GBK (the legacy encoding mod packs from
//! the catalog's region are usually saved in). A name that is neither is kept
//! as opaque bytes: its SHA-256 identifies it in logs and reports, and only
//! its decodable prefix feeds normalization.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// How an archive name was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameEncoding {
    Utf8,
    Gbk,
    /// Neither encoding decoded the whole name; `text` is the UTF-8 prefix.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub text: String,
    pub encoding: NameEncoding,
}

pub fn decode_name(bytes: &[u8]) -> DecodedName {
    match std::str::from_utf8(bytes) {
        Ok(s) => DecodedName {
            text: s.to_string(),
            encoding: NameEncoding::Utf8,
        },
        Err(utf8_err) => {
            if let Some(text) = encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes)
            {
                return DecodedName {
                    text: text.into_owned(),
                    encoding: NameEncoding::Gbk,
                };
            }
            let prefix = &bytes[..utf8_err.valid_up_to()];
            DecodedName {
                text: String::from_utf8_lossy(prefix).into_owned(),
                encoding: NameEncoding::Opaque,
            }
        }
    }
}

/// Decode a fetched page body: UTF-8 (BOM stripped), otherwise GBK with replacement.
pub fn decode_page(bytes: &[u8]) -> String {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (text, _had_errors) = encoding_rs::GBK.decode_without_bom_handling(body);
            text.into_owned()
        }
    }
}

/// SHA-256 of raw name bytes as lowercase hex.
pub fn name_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
