use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
    SPRITE_SHEET,
};

/// A snapshot of the whole machine.
///
/// ## Registers
/// - (v) 16 8-bit registers V0..VF; VF is written as a side effect by the
///   carrying arithmetic and by sprite drawing, so programs treat it as the
///   flag register rather than scratch space
/// - (i) a 16-bit address register used by the memory-relative operations
/// - (pc) a 16-bit program counter, already advanced past the current
///   instruction by the time an operation runs
///
/// ## Memory
/// - 4096 bytes of addressable memory; the glyph sheet sits at address 0 and
///   programs start at 0x200
/// - `program_end` is the offset one past the last loaded program byte; the
///   interpreter halts when pc reaches it exactly
/// - an unbounded stack of return addresses (the machine itself only errors
///   on popping empty, never on depth)
///
/// ## Timers
/// - two 8-bit count-down timers (delay & sound), each decremented once per
///   step while nonzero; the host decides the step cadence
///
/// ## Output
/// - a 64x32 frame buffer of 0/1 cells plus a draw flag the host consumes
///
/// ## Input
/// - none owned here: the key vector arrives as a parameter on every step;
///   `awaiting_key` records the register a key-wait instruction is parked on
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: Vec<u16>,
    pub memory: [u8; MEMORY_SIZE],
    pub program_end: u16,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        // 0x000..0x050 holds the glyph sheet; everything below PROGRAM_START
        // belongs to the interpreter and is never treated as program stream.
        let mut memory = [0; MEMORY_SIZE];
        memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: Vec::new(),
            memory,
            // Nothing loaded yet, so execution halts at the first step.
            program_end: PROGRAM_START,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            awaiting_key: None,
        }
    }
}

/// The FrameBuffer is indexed as [y][x]; cells are 0 or 1.
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed state of the hexadecimal keypad, indexed by key value 0x0..0xF.
pub type Keys = [bool; KEY_COUNT];
