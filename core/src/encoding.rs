//! Text decoding of uploaded files
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Encoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl Encoding {
    /// Detect encoding from raw file content
    pub fn detect(content: &[u8]) -> Self {
        // Check for BOM
        if content.starts_with(&[0xEF, 0xBB, 0xBF]) {
            return Self::Utf8Bom;
        }

        if content.starts_with(&[0xFF, 0xFE]) {
            return Self::Utf16Le;
        }

        if content.starts_with(&[0xFE, 0xFF]) {
            return Self::Utf16Be;
        }

        if std::str::from_utf8(content).is_ok() {
            return Self::Utf8;
        }

        // .properties files are ISO-8859-1 unless stated otherwise
        Self::Latin1
    }
}

/// Decode file bytes to text, returning the detected encoding.
///
/// Never fails: undecodable UTF-16 units are replaced with U+FFFD.
pub fn decode_text(bytes: &[u8]) -> (String, Encoding) {
    let encoding = Encoding::detect(bytes);
    let text = match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf8Bom => String::from_utf8_lossy(&bytes[3..]).into_owned(),
        Encoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
    };
    (text, encoding)
}

fn decode_utf16(content: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = content
        .chunks_exact(2)
        .map(|chunk| unit([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_utf8() {
        let (text, encoding) = decode_text("key=Grüße".as_bytes());
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(text, "key=Grüße");
    }

    #[test]
    fn strips_utf8_bom() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(b"k=v");
        let (text, encoding) = decode_text(&content);
        assert_eq!(encoding, Encoding::Utf8Bom);
        assert_eq!(text, "k=v");
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let mut le = vec![0xFF, 0xFE];
        let mut be = vec![0xFE, 0xFF];
        for unit in "k=é".encode_utf16() {
            le.extend_from_slice(&unit.to_le_bytes());
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&le), ("k=é".to_string(), Encoding::Utf16Le));
        assert_eq!(decode_text(&be), ("k=é".to_string(), Encoding::Utf16Be));
    }

    #[test]
    fn falls_back_to_latin1() {
        // "café" in ISO-8859-1
        let (text, encoding) = decode_text(&[b'c', b'a', b'f', 0xE9]);
        assert_eq!(encoding, Encoding::Latin1);
        assert_eq!(text, "café");
    }
}
