//! Text encodings for the persisted document.

use csvfold_types::Encoding;

use crate::error::{StorageError, StorageResult};

/// Encode `text` in `encoding`.
///
/// Characters outside the encoding's repertoire are rejected rather than
/// replaced.
pub fn encode(text: &str, encoding: Encoding) -> StorageResult<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Latin1 => narrow(text, encoding, 0xFF),
        Encoding::Ascii => narrow(text, encoding, 0x7F),
        // encoding_rs has no UTF-16 encoder.
        Encoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
    }
}

/// Decode `bytes` as `encoding`. A leading UTF-8 BOM is dropped.
///
/// Malformed input is an error, never replaced with U+FFFD.
pub fn decode(bytes: &[u8], encoding: Encoding) -> StorageResult<String> {
    let invalid = |reason: String| StorageError::Decode { encoding, reason };
    match encoding {
        Encoding::Utf8 => {
            let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                return Err(invalid("malformed UTF-8 sequence".to_string()));
            }
            Ok(text.into_owned())
        }
        // Exact byte map: encoding_rs resolves "latin1" to windows-1252.
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(offset) => Err(invalid(format!("non-ASCII byte at offset {offset}"))),
            None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        },
        Encoding::Utf16Le => encoding_rs::UTF_16LE
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| invalid("malformed UTF-16LE sequence".to_string())),
    }
}

fn narrow(text: &str, encoding: Encoding, max: u32) -> StorageResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            if u32::from(c) <= max {
                Ok(u32::from(c) as u8)
            } else {
                Err(StorageError::Unencodable {
                    encoding,
                    character: c,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        let bytes = encode("Nîmes", Encoding::Utf8).unwrap();
        assert_eq!(bytes, "Nîmes".as_bytes());
        assert_eq!(decode(&bytes, Encoding::Utf8).unwrap(), "Nîmes");
    }

    #[test]
    fn latin1_single_byte() {
        let bytes = encode("Nîmes", Encoding::Latin1).unwrap();
        assert_eq!(bytes, vec![b'N', 0xEE, b'm', b'e', b's']);
        assert_eq!(decode(&bytes, Encoding::Latin1).unwrap(), "Nîmes");
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        let err = encode("Łódź", Encoding::Latin1).unwrap_err();
        assert!(matches!(err, StorageError::Unencodable { character: 'Ł', .. }));
    }

    #[test]
    fn ascii_bounds() {
        assert_eq!(encode("PARIS", Encoding::Ascii).unwrap(), b"PARIS");
        assert!(encode("é", Encoding::Ascii).is_err());
        assert!(matches!(
            decode(&[b'a', 0xE9], Encoding::Ascii),
            Err(StorageError::Decode { .. })
        ));
    }

    #[test]
    fn utf16le_layout() {
        let bytes = encode("A€", Encoding::Utf16Le).unwrap();
        assert_eq!(bytes, vec![0x41, 0x00, 0xAC, 0x20]);
        assert_eq!(decode(&bytes, Encoding::Utf16Le).unwrap(), "A€");
        assert!(decode(&bytes[..3], Encoding::Utf16Le).is_err());
    }

    #[test]
    fn utf8_bom_dropped_and_invalid_rejected() {
        assert_eq!(decode(b"\xEF\xBB\xBF[]", Encoding::Utf8).unwrap(), "[]");
        assert!(decode(b"\xC3", Encoding::Utf8).is_err());
    }

    #[test]
    fn utf16le_rejects_lone_surrogate() {
        // 0xD800 with no trailing low surrogate
        let err = decode(&[0x00, 0xD8, 0x41, 0x00], Encoding::Utf16Le).unwrap_err();
        assert!(matches!(err, StorageError::Decode { encoding: Encoding::Utf16Le, .. }));
    }

    #[test]
    fn utf8_bom_removed_only_at_start() {
        assert_eq!(decode("\u{feff}x".as_bytes(), Encoding::Utf8).unwrap(), "x");
        assert_eq!(decode(b"x\xEF\xBB\xBF", Encoding::Utf8).unwrap(), "x\u{feff}");
    }
}
