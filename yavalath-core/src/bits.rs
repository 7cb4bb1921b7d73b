//! Hex digit <-> binary digit string conversion

use crate::error::FormatError;

/// Expand each hex digit (either case) into its four binary digits.
pub fn hex_to_bits(hex: &str) -> Result<String, FormatError> {
    let mut bits = String::with_capacity(hex.len() * 4);
    for (index, ch) in hex.chars().enumerate() {
        let nibble = ch
            .to_digit(16)
            .ok_or(FormatError::InvalidCharacter { ch, index })?;
        bits.push_str(&format!("{:04b}", nibble));
    }
    Ok(bits)
}

/// Pack binary digits into uppercase hex, four at a time.
///
/// A trailing group shorter than four digits is dropped.
pub fn bits_to_hex(bits: &str) -> Result<String, FormatError> {
    let digits = bits.as_bytes();
    let mut hex = String::with_capacity(digits.len() / 4);
    for (chunk_index, chunk) in digits.chunks_exact(4).enumerate() {
        let mut nibble = 0u32;
        for (offset, &b) in chunk.iter().enumerate() {
            let bit = match b {
                b'0' => 0,
                b'1' => 1,
                _ => {
                    return Err(FormatError::InvalidBit {
                        ch: b as char,
                        index: chunk_index * 4 + offset,
                    })
                }
            };
            nibble = (nibble << 1) | bit;
        }
        // nibble < 16
        if let Some(ch) = char::from_digit(nibble, 16) {
            hex.push(ch.to_ascii_uppercase());
        }
    }
    Ok(hex)
}
