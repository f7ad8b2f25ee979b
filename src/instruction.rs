use crate::error::Result;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::{Keys, State};

/// Selects the operation for a given opcode.
///
/// Family 0 sub-selects on its low byte, as do E and F; families 5 and 9
/// ignore their low nibble. Patterns with no row here (remaining 0NNN
/// system calls, the 8XY shift/borrow variants, unknown E/F selectors)
/// decode to `noop`; this machine executes them as instructions that change
/// nothing.
pub fn from_op(op: &dyn Opcode) -> fn(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State> {
    match op.nibbles() {
        (0x0, .., 0xE, 0x0) => clr,
        (0x0, .., 0xE, 0xE) => rts,
        (0x1, ..) => jump,
        (0x2, ..) => call,
        (0x3, ..) => ske,
        (0x4, ..) => skne,
        (0x5, ..) => skre,
        (0x6, ..) => load,
        (0x7, ..) => add,
        (0x8, .., 0x0) => mv,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => addc,
        (0x8, .., 0x5) => subb,
        (0x9, ..) => skrne,
        (0xA, ..) => loadi,
        (0xB, ..) => jumpo,
        (0xC, ..) => rand,
        (0xD, ..) => draw,
        (0xE, .., 0x9, 0xE) => skpr,
        (0xE, .., 0xA, 0x1) => skup,
        (0xF, .., 0x0, 0x7) => getd,
        (0xF, .., 0x0, 0xA) => keyd,
        (0xF, .., 0x1, 0x5) => setd,
        (0xF, .., 0x1, 0x8) => sets,
        (0xF, .., 0x1, 0xE) => addi,
        (0xF, .., 0x2, 0x9) => font,
        (0xF, .., 0x3, 0x3) => bcd,
        (0xF, .., 0x5, 0x5) => save,
        (0xF, .., 0x6, 0x5) => restore,
        _ => noop,
    }
}
