//! Wire-format limits.

/// Largest count or length an 8-bit prefix can carry.
pub const MAX_P8_LEN: usize = 0xff;

/// Largest count or length a 16-bit prefix can carry.
pub const MAX_P16_LEN: usize = 0xffff;

/// Size of a framed record header: `u16 size | magic[4] | u8 major | u8 minor`.
pub const RECORD_HEADER_SIZE: usize = 8;
