//! Bit-level helpers shared by the register payload types.
//!
//! Register payloads travel as four bytes, most significant byte first. A
//! register narrower than 32 bits occupies the low-order end of that word:
//! its upper bytes are written as zero and ignored when read back. Signed
//! narrow values are sign-extended from their top bit.

/// A contiguous run of bits inside a 32-bit register word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Position of the least significant bit.
    pub offset: u8,
    /// Number of bits (1-32).
    pub width: u8,
}

impl Field {
    /// Create a field descriptor.
    ///
    /// Panics at compile time when used in a const context with a layout that
    /// does not fit in 32 bits.
    pub const fn new(offset: u8, width: u8) -> Self {
        assert!(width >= 1 && (offset as u32) + (width as u32) <= 32);
        Self { offset, width }
    }

    /// Mask of the bits covered by this field, in word position.
    #[inline]
    pub const fn mask(self) -> u32 {
        let low = if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        };
        low << self.offset
    }

    /// Extract the field as an unsigned value.
    #[inline]
    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.offset
    }

    /// Extract the field as a two's-complement signed value.
    #[inline]
    pub const fn extract_signed(self, word: u32) -> i32 {
        sign_extend(self.extract(word), self.width)
    }

    /// Replace the field inside `word`. Bits of `value` above the width are dropped.
    #[inline]
    pub const fn insert(self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.offset) & self.mask())
    }

    /// Whether `value` fits in the field unsigned.
    #[inline]
    pub const fn fits(self, value: u32) -> bool {
        value <= (self.mask() >> self.offset)
    }

    /// Whether `value` fits in the field as a signed quantity.
    #[inline]
    pub const fn fits_signed(self, value: i32) -> bool {
        if self.width >= 32 {
            return true;
        }
        let half = 1i64 << (self.width - 1);
        (value as i64) >= -half && (value as i64) < half
    }
}

/// Low byte of the word (TPOWERDOWN, RAMPMODE).
pub const LOW_BYTE: Field = Field::new(0, 8);

/// Low 24 bits of the word (VACTUAL).
pub const LOW_24: Field = Field::new(0, 24);

/// Sign-extend the low `width` bits of `value`.
#[inline]
pub const fn sign_extend(value: u32, width: u8) -> i32 {
    if width >= 32 {
        return value as i32;
    }
    let shift = 32 - width as u32;
    ((value << shift) as i32) >> shift
}

/// Assemble the register word from a wire payload.
#[inline]
pub const fn word_from_payload(payload: [u8; 4]) -> u32 {
    u32::from_be_bytes(payload)
}

/// Split a register word into its wire payload.
#[inline]
pub const fn payload_from_word(word: u32) -> [u8; 4] {
    word.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mask_and_extract() {
        let irun = Field::new(8, 5);
        assert_eq!(irun.mask(), 0x0000_1F00);
        assert_eq!(irun.extract(0x0002_0F02), 0x0F);
        assert_eq!(irun.insert(0, 0x3F), 0x0000_1F00);
    }

    #[test]
    fn test_full_width_field() {
        let word = Field::new(0, 32);
        assert_eq!(word.mask(), u32::MAX);
        assert_eq!(word.extract(0xDEAD_BEEF), 0xDEAD_BEEF);
        assert!(word.fits_signed(i32::MIN));
    }

    #[test]
    fn test_sign_extension_from_bit_23() {
        assert_eq!(LOW_24.extract_signed(0x00FF_FFFF), -1);
        assert_eq!(LOW_24.extract_signed(0x0080_0000), -8_388_608);
        assert_eq!(LOW_24.extract_signed(0x007F_FFFF), 8_388_607);
        // Padding byte is ignored
        assert_eq!(LOW_24.extract_signed(0xAB00_0010), 16);
    }

    #[test]
    fn test_signed_range() {
        assert!(LOW_24.fits_signed(-8_388_608));
        assert!(!LOW_24.fits_signed(8_388_608));
        assert!(LOW_BYTE.fits(255));
        assert!(!LOW_BYTE.fits(256));
    }

    #[test]
    fn test_payload_is_big_endian() {
        assert_eq!(payload_from_word(10), [0, 0, 0, 10]);
        assert_eq!(word_from_payload([0, 0, 0x27, 0x10]), 10_000);
    }
}
