//! Character set transcoding
//!
//! The record stream is always IBM PC 8-bit extended ASCII (codepage 437);
//! everything above the wire is Unicode. Characters with no codepage 437
//! form are written as `?`.

use codepage_437::{FromCp437, ToCp437, CP437_CONTROL};

const REPLACEMENT: u8 = b'?';

/// Decode codepage 437 bytes into Unicode text
pub fn decode(bytes: &[u8]) -> String {
    String::from_cp437(bytes.to_vec(), &CP437_CONTROL)
}

/// Encode Unicode text into codepage 437 bytes
pub fn encode(text: &str) -> Vec<u8> {
    match text.to_cp437(&CP437_CONTROL) {
        Ok(bytes) => bytes.to_vec(),
        Err(_) => text.chars().map(encode_char).collect(),
    }
}

fn encode_char(c: char) -> u8 {
    let mut buf = [0u8; 4];
    let s: &str = c.encode_utf8(&mut buf);
    match s.to_cp437(&CP437_CONTROL) {
        Ok(bytes) => bytes.first().copied().unwrap_or(REPLACEMENT),
        Err(_) => REPLACEMENT,
    }
}

/// Split decoded text into lines, accepting `\r\n`, `\n` and lone `\r`
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .flat_map(|l| l.split('\r'))
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swedish_letters_map_to_cp437() {
        assert_eq!(encode("åäöÅÄÖ"), vec![0x86, 0x84, 0x94, 0x8F, 0x8E, 0x99]);
        assert_eq!(decode(&[0x86, 0x84, 0x94, 0x8F, 0x8E, 0x99]), "åäöÅÄÖ");
    }

    #[test]
    fn test_ascii_is_unchanged() {
        assert_eq!(encode("#KONTO 1910 Kassa"), b"#KONTO 1910 Kassa".to_vec());
        assert_eq!(decode(b"#FLAGGA 0"), "#FLAGGA 0");
    }

    #[test]
    fn test_unmappable_is_replaced() {
        assert_eq!(encode("a€b"), vec![b'a', b'?', b'b']);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(
            split_lines("#FLAGGA 0\r\n#SIETYP 4\n\r\n#KSUMMA"),
            vec!["#FLAGGA 0", "#SIETYP 4", "#KSUMMA"]
        );
    }
}
