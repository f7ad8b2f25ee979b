use sdl2::keyboard::{KeyboardState, Scancode};

use viper8::state::Keys;

/// # Keymap
/// The machine reads a hexadecimal keypad. Its sixteen keys live on the
/// left four columns of the keyboard, row by row:
/// ```text
/// |1|2|3|4|      |0|1|2|3|
/// |Q|W|E|R|  ->  |4|5|6|7|
/// |A|S|D|F|  ->  |8|9|A|B|
/// |Z|X|C|V|      |C|D|E|F|
/// ```
pub const KEY_SCANCODES: [Scancode; 16] = [
    Scancode::Num1,
    Scancode::Num2,
    Scancode::Num3,
    Scancode::Num4,
    Scancode::Q,
    Scancode::W,
    Scancode::E,
    Scancode::R,
    Scancode::A,
    Scancode::S,
    Scancode::D,
    Scancode::F,
    Scancode::Z,
    Scancode::X,
    Scancode::C,
    Scancode::V,
];

/// Snapshots the sixteen virtual keys from the host keyboard state.
pub fn pressed_keys(keyboard: &KeyboardState) -> Keys {
    let mut keys = [false; 16];
    for (key, scancode) in KEY_SCANCODES.iter().enumerate() {
        keys[key] = keyboard.is_scancode_pressed(*scancode);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scancode_rows_start_where_expected() {
        assert_eq!(KEY_SCANCODES[0x0], Scancode::Num1);
        assert_eq!(KEY_SCANCODES[0x4], Scancode::Q);
        assert_eq!(KEY_SCANCODES[0x8], Scancode::A);
        assert_eq!(KEY_SCANCODES[0xC], Scancode::Z);
        assert_eq!(KEY_SCANCODES[0xF], Scancode::V);
    }
}
