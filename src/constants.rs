//! Constant values of the machine this crate interprets.

/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Mask that keeps a memory index inside the 12-bit address space.
pub const ADDRESS_MASK: usize = MEMORY_SIZE - 1;

/// Where program images are loaded and where execution starts.
/// The bytes below this offset belong to the interpreter (glyph table).
pub const PROGRAM_START: u16 = 0x200;

/// Number of general purpose registers (V0..VF).
pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry/borrow/collision flag.
pub const FLAG: usize = 0xF;

/// Display dimensions in cells. The frame buffer is indexed `[y][x]`.
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of keys on the hexadecimal keypad.
pub const KEY_COUNT: usize = 16;

/// Bytes per glyph in the built-in sprite sheet.
pub const GLYPH_SIZE: u16 = 5;

/// Base step rate in Hz. The host owns all pacing; this is the rate at which
/// the two timers reach their nominal 60 decrements per second, and hosts
/// multiply it by a speed level for faster execution.
pub const BASE_STEP_HZ: u32 = 60;

/// Built-in glyphs for the hex digits 0..F, five rows each, one byte per row
/// with the glyph in the high nibble. Copied into memory at address 0.
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
