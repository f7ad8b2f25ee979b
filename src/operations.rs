use crate::constants::{ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, GLYPH_SIZE};
use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::state::{Keys, State};

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..state.clone()
    })
}

/// PC = STACK.pop()
/// The saved address is already past the call, so it is restored verbatim.
pub fn rts(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut stack = state.stack.clone();
    let pc = stack.pop().ok_or(Error::StackUnderflow { pc: state.pc })?;
    Ok(State {
        pc,
        stack,
        ..state.clone()
    })
}

/// PC = nnn
pub fn jump(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        pc: op.nnn(),
        ..state.clone()
    })
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut stack = state.stack.clone();
    stack.push(state.pc);
    Ok(State {
        pc: op.nnn(),
        stack,
        ..state.clone()
    })
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let pc = if state.v[op.x() as usize] == op.nn() {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let pc = if state.v[op.x() as usize] != op.nn() {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let pc = if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] = op.nn();
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx += nn
/// Wraps on overflow; the flag register is left alone.
pub fn add(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.nn());
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] |= v[op.y() as usize];
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] ^= v[op.y() as usize];
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx += Vy; VF = carry
/// Flag and sum both come from the operands as they were before the
/// instruction; the flag is written first, so when x is F the sum wins.
pub fn addc(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let (res, over) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    let mut v = state.v;
    v[FLAG] = if over { 0x1 } else { 0x0 };
    v[op.x() as usize] = res;
    Ok(State {
        v,
        ..state.clone()
    })
}

/// Vx -= Vy; VF = !borrow
/// Same ordering as addc: flag first, difference second.
pub fn subb(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let (res, under) = state.v[op.x() as usize].overflowing_sub(state.v[op.y() as usize]);
    let mut v = state.v;
    v[FLAG] = if under { 0x0 } else { 0x1 };
    v[op.x() as usize] = res;
    Ok(State {
        v,
        ..state.clone()
    })
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let pc = if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// I = nnn
pub fn loadi(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        i: op.nnn(),
        ..state.clone()
    })
}

/// PC = nnn + V0
pub fn jumpo(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        pc: op.nnn() + u16::from(state.v[0x0]),
        ..state.clone()
    })
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let byte: u8 = rand::random();
    let mut v = state.v;
    v[op.x() as usize] = byte & op.nn();
    Ok(State {
        v,
        ..state.clone()
    })
}

/// draw_sprite(x=Vx y=Vy rows=n)
/// XORs the n-row sprite at memory[I..] onto the frame buffer at (Vx, Vy).
/// Cells past the right or bottom edge are clipped, never wrapped. VF is set
/// when any lit cell is erased and stays set for the rest of the draw.
pub fn draw(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    v[FLAG] = 0x0;

    for row in 0..op.n() as usize {
        let y = state.v[op.y() as usize] as usize + row;
        if y >= DISPLAY_HEIGHT {
            continue;
        }
        let sprite_row = state.memory[(state.i as usize + row) & ADDRESS_MASK];
        for bit in 0..8 {
            let x = state.v[op.x() as usize] as usize + bit;
            if x >= DISPLAY_WIDTH {
                continue;
            }
            let pixel = (sprite_row >> (7 - bit)) & 0x1;
            v[FLAG] |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    Ok(State {
        v,
        frame_buffer,
        draw_flag: true,
        ..state.clone()
    })
}

/// if key[Vx] is down then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State> {
    let key = (state.v[op.x() as usize] & 0xF) as usize;
    let pc = if keys[key] {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// if key[Vx] is up then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State> {
    let key = (state.v[op.x() as usize] & 0xF) as usize;
    let pc = if !keys[key] {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    Ok(State {
        pc,
        ..state.clone()
    })
}

/// Vx = DT
pub fn getd(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State {
        v,
        ..state.clone()
    })
}

/// park on Vx until a key arrives
/// Stepping resumes once the host reports a pressed key; nothing else here.
pub fn keyd(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        awaiting_key: Some(op.x()),
        ..state.clone()
    })
}

/// DT = Vx
pub fn setd(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        delay_timer: state.v[op.x() as usize],
        ..state.clone()
    })
}

/// ST = Vx
pub fn sets(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        sound_timer: state.v[op.x() as usize],
        ..state.clone()
    })
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(State {
        i: state.i.wrapping_add(u16::from(state.v[op.x() as usize])),
        ..state.clone()
    })
}

/// I = glyph(Vx) * 5
/// Vx holds an ASCII hex character; anything unrecognized maps to glyph 0.
pub fn font(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let glyph = match state.v[op.x() as usize] {
        c @ b'0'..=b'9' => c - b'0',
        c @ b'a'..=b'f' => c - b'a' + 10,
        c @ b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    };
    Ok(State {
        i: u16::from(glyph) * GLYPH_SIZE,
        ..state.clone()
    })
}

/// mem[I..I+3] = the decimal digits of Vx, as ASCII digit bytes
pub fn bcd(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let value = state.v[op.x() as usize];
    let digits = [
        b'0' + value / 100,
        b'0' + value / 10 % 10,
        b'0' + value % 10,
    ];
    let mut memory = state.memory;
    for (offset, digit) in digits.iter().enumerate() {
        memory[(state.i as usize + offset) & ADDRESS_MASK] = *digit;
    }
    Ok(State {
        memory,
        ..state.clone()
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn save(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut memory = state.memory;
    for n in 0..=op.x() as usize {
        memory[(state.i as usize + n) & ADDRESS_MASK] = state.v[n];
    }
    Ok(State {
        memory,
        ..state.clone()
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn restore(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    let mut v = state.v;
    for n in 0..=op.x() as usize {
        v[n] = state.memory[(state.i as usize + n) & ADDRESS_MASK];
    }
    Ok(State {
        v,
        ..state.clone()
    })
}

/// the pattern decodes to nothing on this machine
pub fn noop(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State> {
    Ok(state.clone())
}
