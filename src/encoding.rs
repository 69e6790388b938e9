//! Windows-1252 (WinAnsi) character mapping.
//!
//! Shared by the RTF reader (`\'hh` escapes) and the PDF writer, whose
//! base fonts use `/WinAnsiEncoding`.

use encoding_rs::{EncoderResult, WINDOWS_1252};

/// Byte written in place of characters the encoding cannot represent.
pub const UNMAPPABLE: u8 = b'?';

/// Decode one Windows-1252 byte.
///
/// Bytes without a printable mapping decode to the matching C1 control.
pub fn decode_byte(byte: u8) -> char {
    let bytes = [byte];
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
    decoded
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Encode one character as a Windows-1252 byte, if representable.
pub fn encode_char(c: char) -> Option<u8> {
    let mut utf8 = [0u8; 4];
    let mut out = [0u8; 4];
    let (result, _, written) = WINDOWS_1252
        .new_encoder()
        .encode_from_utf8_without_replacement(c.encode_utf8(&mut utf8), &mut out, true);
    match result {
        EncoderResult::InputEmpty if written == 1 => Some(out[0]),
        _ => None,
    }
}

/// Encode a string, replacing unrepresentable characters with `?`.
pub fn encode_lossy(text: &str) -> Vec<u8> {
    let mut encoder = WINDOWS_1252.new_encoder();
    // Single-byte encoding: never more bytes out than UTF-8 bytes in.
    let mut out = vec![0u8; text.len()];
    let mut total = 0;
    let mut remaining = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut out[total..], true);
        total += written;
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::Unmappable(_) => {
                out[total] = UNMAPPABLE;
                total += 1;
            }
            EncoderResult::OutputFull => out.resize(out.len() * 2 + 16, 0),
        }
    }

    out.truncate(total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_and_latin1() {
        assert_eq!(encode_char('A'), Some(b'A'));
        assert_eq!(encode_char('é'), Some(0xE9));
        assert_eq!(decode_byte(0xE9), 'é');
    }

    #[test]
    fn test_high_control_range() {
        assert_eq!(encode_char('•'), Some(0x95));
        assert_eq!(encode_char('–'), Some(0x96));
        assert_eq!(encode_char('™'), Some(0x99));
        assert_eq!(encode_char('→'), None);
        assert_eq!(decode_byte(0x93), '\u{201C}');
        assert_eq!(decode_byte(0x81), '\u{81}');
    }

    #[test]
    fn test_lossy() {
        assert_eq!(encode_lossy("a→b"), b"a?b".to_vec());
        assert_eq!(encode_lossy("© 2026"), vec![0xA9, b' ', b'2', b'0', b'2', b'6']);
        assert_eq!(encode_lossy("→→"), b"??".to_vec());
        assert!(encode_lossy("").is_empty());
    }
}
