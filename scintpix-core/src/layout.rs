//! Fixed field layout of a scintillator record.
//!
//! Each input line carries a 16x16 detector image followed by the energy and
//! position of up to two interactions:
//!
//! | Offset    | Field        |
//! |-----------|--------------|
//! | 0..256    | image pixels |
//! | 256       | energy 1     |
//! | 257, 258  | x1, y1       |
//! | 259       | energy 2     |
//! | 260, 261  | x2, y2       |

/// Side length of the square detector image.
pub const IMAGE_SIDE: usize = 16;

/// Number of pixels in one detector image.
pub const IMAGE_LEN: usize = IMAGE_SIDE * IMAGE_SIDE;

/// Energy deposited by the first interaction.
pub const ENERGY1: usize = IMAGE_LEN;
/// X position of the first interaction.
pub const POS1_X: usize = IMAGE_LEN + 1;
/// Y position of the first interaction.
pub const POS1_Y: usize = IMAGE_LEN + 2;
/// Energy deposited by the second interaction (0 for single events).
pub const ENERGY2: usize = IMAGE_LEN + 3;
/// X position of the second interaction.
pub const POS2_X: usize = IMAGE_LEN + 4;
/// Y position of the second interaction.
pub const POS2_Y: usize = IMAGE_LEN + 5;

/// Total number of fields in one record.
pub const RECORD_LEN: usize = IMAGE_LEN + 6;

/// Field offsets gathered into the energy pair, in output order.
pub const ENERGY_FIELDS: [usize; 2] = [ENERGY1, ENERGY2];

/// Field offsets gathered into the position quadruple, in output order.
pub const POSITION_FIELDS: [usize; 4] = [POS1_X, POS1_Y, POS2_X, POS2_Y];
