/// # Opcode fields
///
/// Every instruction is one big-endian 16-bit word. The high nibble selects
/// the operation family; depending on the family the remaining bits are read
/// as some combination of:
///
/// - `x` is bits 8..12 and selects the register Vx (or the range V0..=Vx)
/// - `y` is bits 4..8 and selects the register Vy
/// - `n` is the low nibble, a sprite height
/// - `nn` is the low byte, an immediate operand
/// - `nnn` is the low 12 bits, an absolute address
///
/// Some families dispatch further on `n` or `nn`; `nibbles` exposes the raw
/// split for that purpose.
pub trait Opcode {
    /// The component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Register selector Vx.
    fn x(&self) -> u8;

    /// Register selector Vy.
    fn y(&self) -> u8;

    /// Low nibble immediate.
    fn n(&self) -> u8;

    /// Low byte immediate.
    fn nn(&self) -> u8;

    /// Low 12 bits, an address into the 4K space.
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xD123;
        assert_eq!(op.nibbles(), (0xD, 0x1, 0x2, 0x3));
    }

    #[test]
    fn test_x() {
        let op: u16 = 0xD123;
        assert_eq!(op.x(), 0x1);
    }

    #[test]
    fn test_y() {
        let op: u16 = 0xD123;
        assert_eq!(op.y(), 0x2);
    }

    #[test]
    fn test_n() {
        let op: u16 = 0xD123;
        assert_eq!(op.n(), 0x3);
    }

    #[test]
    fn test_nn() {
        let op: u16 = 0xD123;
        assert_eq!(op.nn(), 0x23);
    }

    #[test]
    fn test_nnn() {
        let op: u16 = 0xD123;
        assert_eq!(op.nnn(), 0x123);
    }
}
