//! Constants used in `EM*` / `EG*` blocks

/// Magic of a single-frame block
pub const MAGIC_SINGLE: [u8; 3] = *b"EM1";

/// Magic of a legacy single-frame block (raw palette indices, decode only)
pub const MAGIC_LEGACY: [u8; 3] = *b"EM0";

/// Magic of a static grid block
pub const MAGIC_STATIC: [u8; 3] = *b"EGS";

/// Magic of an animated grid block
pub const MAGIC_ANIMATED: [u8; 3] = *b"EGA";
