use super::{AccessType, AddressingMode};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

#[derive(Debug)]
pub struct Opcode {
    pub code: u8,
    pub name: &'static str,
    pub mnemonic: Mnemonic,
    pub size: u8,
    pub cycles: u8,
    pub mode: AddressingMode,
    pub access_type: AccessType,
}

impl Opcode {
    pub const fn new(
        code: u8,
        name: &'static str,
        mnemonic: Mnemonic,
        size: u8,
        cycles: u8,
        mode: AddressingMode,
        access_type: AccessType,
    ) -> Self {
        Self {
            code,
            name,
            mnemonic,
            size,
            cycles,
            mode,
            access_type,
        }
    }
}

use AccessType::{None as NoAccess, Read, ReadModifyWrite as Rmw, Write};
use AddressingMode::*;
use Mnemonic::*;

// Opcodes missing from this table are undocumented: fetching one costs nothing
#[rustfmt::skip]
const OPCODES: &[Opcode] = &[
    // Software-defined interrupt
    Opcode::new(0x00, "BRK", Brk, 2, 7, Implied, NoAccess),

    Opcode::new(0xEA, "NOP", Nop, 1, 2, Implied, NoAccess),

    // Transfers
    Opcode::new(0xAA, "TAX", Tax, 1, 2, Implied, NoAccess),
    Opcode::new(0xA8, "TAY", Tay, 1, 2, Implied, NoAccess),
    Opcode::new(0x8A, "TXA", Txa, 1, 2, Implied, NoAccess),
    Opcode::new(0x98, "TYA", Tya, 1, 2, Implied, NoAccess),
    Opcode::new(0xBA, "TSX", Tsx, 1, 2, Implied, NoAccess),
    Opcode::new(0x9A, "TXS", Txs, 1, 2, Implied, NoAccess),

    // Flags
    Opcode::new(0xF8, "SED", Sed, 1, 2, Implied, NoAccess),
    Opcode::new(0x78, "SEI", Sei, 1, 2, Implied, NoAccess),
    Opcode::new(0x38, "SEC", Sec, 1, 2, Implied, NoAccess),
    Opcode::new(0xD8, "CLD", Cld, 1, 2, Implied, NoAccess),
    Opcode::new(0x58, "CLI", Cli, 1, 2, Implied, NoAccess),
    Opcode::new(0x18, "CLC", Clc, 1, 2, Implied, NoAccess),
    Opcode::new(0xB8, "CLV", Clv, 1, 2, Implied, NoAccess),

    // Loads
    Opcode::new(0xA9, "LDA", Lda, 2, 2, Immediate, Read),
    Opcode::new(0xA5, "LDA", Lda, 2, 3, ZeroPage,  Read),
    Opcode::new(0xB5, "LDA", Lda, 2, 4, ZeroPageX, Read),
    Opcode::new(0xAD, "LDA", Lda, 3, 4, Absolute,  Read),
    Opcode::new(0xBD, "LDA", Lda, 3, 4, AbsoluteX, Read), // cycles +1 if page crossed
    Opcode::new(0xB9, "LDA", Lda, 3, 4, AbsoluteY, Read), // cycles +1 if page crossed
    Opcode::new(0xA1, "LDA", Lda, 2, 6, IndirectX, Read),
    Opcode::new(0xB1, "LDA", Lda, 2, 5, IndirectY, Read), // cycles +1 if page crossed

    Opcode::new(0xA2, "LDX", Ldx, 2, 2, Immediate, Read),
    Opcode::new(0xA6, "LDX", Ldx, 2, 3, ZeroPage,  Read),
    Opcode::new(0xB6, "LDX", Ldx, 2, 4, ZeroPageY, Read),
    Opcode::new(0xAE, "LDX", Ldx, 3, 4, Absolute,  Read),
    Opcode::new(0xBE, "LDX", Ldx, 3, 4, AbsoluteY, Read), // cycles +1 if page crossed

    Opcode::new(0xA0, "LDY", Ldy, 2, 2, Immediate, Read),
    Opcode::new(0xA4, "LDY", Ldy, 2, 3, ZeroPage,  Read),
    Opcode::new(0xB4, "LDY", Ldy, 2, 4, ZeroPageX, Read),
    Opcode::new(0xAC, "LDY", Ldy, 3, 4, Absolute,  Read),
    Opcode::new(0xBC, "LDY", Ldy, 3, 4, AbsoluteX, Read), // cycles +1 if page crossed

    // Stores (indexed modes always pay the page-cross cycle)
    Opcode::new(0x85, "STA", Sta, 2, 3, ZeroPage,  Write),
    Opcode::new(0x95, "STA", Sta, 2, 4, ZeroPageX, Write),
    Opcode::new(0x8D, "STA", Sta, 3, 4, Absolute,  Write),
    Opcode::new(0x9D, "STA", Sta, 3, 4, AbsoluteX, Write),
    Opcode::new(0x99, "STA", Sta, 3, 4, AbsoluteY, Write),
    Opcode::new(0x81, "STA", Sta, 2, 6, IndirectX, Write),
    Opcode::new(0x91, "STA", Sta, 2, 5, IndirectY, Write),

    Opcode::new(0x86, "STX", Stx, 2, 3, ZeroPage,  Write),
    Opcode::new(0x96, "STX", Stx, 2, 4, ZeroPageY, Write),
    Opcode::new(0x8E, "STX", Stx, 3, 4, Absolute,  Write),

    Opcode::new(0x84, "STY", Sty, 2, 3, ZeroPage,  Write),
    Opcode::new(0x94, "STY", Sty, 2, 4, ZeroPageX, Write),
    Opcode::new(0x8C, "STY", Sty, 3, 4, Absolute,  Write),

    // Stack
    Opcode::new(0x48, "PHA", Pha, 1, 3, Implied, NoAccess),
    Opcode::new(0x08, "PHP", Php, 1, 3, Implied, NoAccess),
    Opcode::new(0x68, "PLA", Pla, 1, 4, Implied, NoAccess),
    Opcode::new(0x28, "PLP", Plp, 1, 4, Implied, NoAccess),

    // Jumps and returns
    Opcode::new(0x4C, "JMP", Jmp, 3, 3, Absolute, NoAccess),
    Opcode::new(0x6C, "JMP", Jmp, 3, 5, Indirect, NoAccess), // $xxFF page-wrap bug
    Opcode::new(0x20, "JSR", Jsr, 3, 6, Absolute, NoAccess),
    Opcode::new(0x60, "RTS", Rts, 1, 6, Implied,  NoAccess),
    Opcode::new(0x40, "RTI", Rti, 1, 6, Implied,  NoAccess),

    // Branches: +1 if taken, +1 more if the target is on another page
    Opcode::new(0x90, "BCC", Bcc, 2, 2, Relative, NoAccess),
    Opcode::new(0xB0, "BCS", Bcs, 2, 2, Relative, NoAccess),
    Opcode::new(0xF0, "BEQ", Beq, 2, 2, Relative, NoAccess),
    Opcode::new(0x30, "BMI", Bmi, 2, 2, Relative, NoAccess),
    Opcode::new(0xD0, "BNE", Bne, 2, 2, Relative, NoAccess),
    Opcode::new(0x10, "BPL", Bpl, 2, 2, Relative, NoAccess),
    Opcode::new(0x50, "BVC", Bvc, 2, 2, Relative, NoAccess),
    Opcode::new(0x70, "BVS", Bvs, 2, 2, Relative, NoAccess),

    // Increments and decrements
    Opcode::new(0xE8, "INX", Inx, 1, 2, Implied, NoAccess),
    Opcode::new(0xC8, "INY", Iny, 1, 2, Implied, NoAccess),
    Opcode::new(0xCA, "DEX", Dex, 1, 2, Implied, NoAccess),
    Opcode::new(0x88, "DEY", Dey, 1, 2, Implied, NoAccess),

    Opcode::new(0xE6, "INC", Inc, 2, 5, ZeroPage,  Rmw),
    Opcode::new(0xF6, "INC", Inc, 2, 6, ZeroPageX, Rmw),
    Opcode::new(0xEE, "INC", Inc, 3, 6, Absolute,  Rmw),
    Opcode::new(0xFE, "INC", Inc, 3, 6, AbsoluteX, Rmw),

    Opcode::new(0xC6, "DEC", Dec, 2, 5, ZeroPage,  Rmw),
    Opcode::new(0xD6, "DEC", Dec, 2, 6, ZeroPageX, Rmw),
    Opcode::new(0xCE, "DEC", Dec, 3, 6, Absolute,  Rmw),
    Opcode::new(0xDE, "DEC", Dec, 3, 6, AbsoluteX, Rmw),

    // Shifts and rotates
    Opcode::new(0x0A, "ASL", Asl, 1, 2, Accumulator, NoAccess),
    Opcode::new(0x06, "ASL", Asl, 2, 5, ZeroPage,    Rmw),
    Opcode::new(0x16, "ASL", Asl, 2, 6, ZeroPageX,   Rmw),
    Opcode::new(0x0E, "ASL", Asl, 3, 6, Absolute,    Rmw),
    Opcode::new(0x1E, "ASL", Asl, 3, 6, AbsoluteX,   Rmw),

    Opcode::new(0x4A, "LSR", Lsr, 1, 2, Accumulator, NoAccess),
    Opcode::new(0x46, "LSR", Lsr, 2, 5, ZeroPage,    Rmw),
    Opcode::new(0x56, "LSR", Lsr, 2, 6, ZeroPageX,   Rmw),
    Opcode::new(0x4E, "LSR", Lsr, 3, 6, Absolute,    Rmw),
    Opcode::new(0x5E, "LSR", Lsr, 3, 6, AbsoluteX,   Rmw),

    Opcode::new(0x2A, "ROL", Rol, 1, 2, Accumulator, NoAccess),
    Opcode::new(0x26, "ROL", Rol, 2, 5, ZeroPage,    Rmw),
    Opcode::new(0x36, "ROL", Rol, 2, 6, ZeroPageX,   Rmw),
    Opcode::new(0x2E, "ROL", Rol, 3, 6, Absolute,    Rmw),
    Opcode::new(0x3E, "ROL", Rol, 3, 6, AbsoluteX,   Rmw),

    Opcode::new(0x6A, "ROR", Ror, 1, 2, Accumulator, NoAccess),
    Opcode::new(0x66, "ROR", Ror, 2, 5, ZeroPage,    Rmw),
    Opcode::new(0x76, "ROR", Ror, 2, 6, ZeroPageX,   Rmw),
    Opcode::new(0x6E, "ROR", Ror, 3, 6, Absolute,    Rmw),
    Opcode::new(0x7E, "ROR", Ror, 3, 6, AbsoluteX,   Rmw),

    // Arithmetic
    Opcode::new(0x69, "ADC", Adc, 2, 2, Immediate, Read),
    Opcode::new(0x65, "ADC", Adc, 2, 3, ZeroPage,  Read),
    Opcode::new(0x75, "ADC", Adc, 2, 4, ZeroPageX, Read),
    Opcode::new(0x6D, "ADC", Adc, 3, 4, Absolute,  Read),
    Opcode::new(0x7D, "ADC", Adc, 3, 4, AbsoluteX, Read),
    Opcode::new(0x79, "ADC", Adc, 3, 4, AbsoluteY, Read),
    Opcode::new(0x61, "ADC", Adc, 2, 6, IndirectX, Read),
    Opcode::new(0x71, "ADC", Adc, 2, 5, IndirectY, Read),

    Opcode::new(0xE9, "SBC", Sbc, 2, 2, Immediate, Read),
    Opcode::new(0xEB, "SBC", Sbc, 2, 2, Immediate, Read), // undocumented alias of $E9
    Opcode::new(0xE5, "SBC", Sbc, 2, 3, ZeroPage,  Read),
    Opcode::new(0xF5, "SBC", Sbc, 2, 4, ZeroPageX, Read),
    Opcode::new(0xED, "SBC", Sbc, 3, 4, Absolute,  Read),
    Opcode::new(0xFD, "SBC", Sbc, 3, 4, AbsoluteX, Read),
    Opcode::new(0xF9, "SBC", Sbc, 3, 4, AbsoluteY, Read),
    Opcode::new(0xE1, "SBC", Sbc, 2, 6, IndirectX, Read),
    Opcode::new(0xF1, "SBC", Sbc, 2, 5, IndirectY, Read),

    // Logic
    Opcode::new(0x29, "AND", And, 2, 2, Immediate, Read),
    Opcode::new(0x25, "AND", And, 2, 3, ZeroPage,  Read),
    Opcode::new(0x35, "AND", And, 2, 4, ZeroPageX, Read),
    Opcode::new(0x2D, "AND", And, 3, 4, Absolute,  Read),
    Opcode::new(0x3D, "AND", And, 3, 4, AbsoluteX, Read),
    Opcode::new(0x39, "AND", And, 3, 4, AbsoluteY, Read),
    Opcode::new(0x21, "AND", And, 2, 6, IndirectX, Read),
    Opcode::new(0x31, "AND", And, 2, 5, IndirectY, Read),

    Opcode::new(0x49, "EOR", Eor, 2, 2, Immediate, Read),
    Opcode::new(0x45, "EOR", Eor, 2, 3, ZeroPage,  Read),
    Opcode::new(0x55, "EOR", Eor, 2, 4, ZeroPageX, Read),
    Opcode::new(0x4D, "EOR", Eor, 3, 4, Absolute,  Read),
    Opcode::new(0x5D, "EOR", Eor, 3, 4, AbsoluteX, Read),
    Opcode::new(0x59, "EOR", Eor, 3, 4, AbsoluteY, Read),
    Opcode::new(0x41, "EOR", Eor, 2, 6, IndirectX, Read),
    Opcode::new(0x51, "EOR", Eor, 2, 5, IndirectY, Read),

    Opcode::new(0x09, "ORA", Ora, 2, 2, Immediate, Read),
    Opcode::new(0x05, "ORA", Ora, 2, 3, ZeroPage,  Read),
    Opcode::new(0x15, "ORA", Ora, 2, 4, ZeroPageX, Read),
    Opcode::new(0x0D, "ORA", Ora, 3, 4, Absolute,  Read),
    Opcode::new(0x1D, "ORA", Ora, 3, 4, AbsoluteX, Read),
    Opcode::new(0x19, "ORA", Ora, 3, 4, AbsoluteY, Read),
    Opcode::new(0x01, "ORA", Ora, 2, 6, IndirectX, Read),
    Opcode::new(0x11, "ORA", Ora, 2, 5, IndirectY, Read),

    Opcode::new(0x24, "BIT", Bit, 2, 3, ZeroPage, Read),
    Opcode::new(0x2C, "BIT", Bit, 3, 4, Absolute, Read),

    // Comparisons
    Opcode::new(0xC9, "CMP", Cmp, 2, 2, Immediate, Read),
    Opcode::new(0xC5, "CMP", Cmp, 2, 3, ZeroPage,  Read),
    Opcode::new(0xD5, "CMP", Cmp, 2, 4, ZeroPageX, Read),
    Opcode::new(0xCD, "CMP", Cmp, 3, 4, Absolute,  Read),
    Opcode::new(0xDD, "CMP", Cmp, 3, 4, AbsoluteX, Read),
    Opcode::new(0xD9, "CMP", Cmp, 3, 4, AbsoluteY, Read),
    Opcode::new(0xC1, "CMP", Cmp, 2, 6, IndirectX, Read),
    Opcode::new(0xD1, "CMP", Cmp, 2, 5, IndirectY, Read),

    Opcode::new(0xE0, "CPX", Cpx, 2, 2, Immediate, Read),
    Opcode::new(0xE4, "CPX", Cpx, 2, 3, ZeroPage,  Read),
    Opcode::new(0xEC, "CPX", Cpx, 3, 4, Absolute,  Read),

    Opcode::new(0xC0, "CPY", Cpy, 2, 2, Immediate, Read),
    Opcode::new(0xC4, "CPY", Cpy, 2, 3, ZeroPage,  Read),
    Opcode::new(0xCC, "CPY", Cpy, 3, 4, Absolute,  Read),
];

pub static OPCODES_MAP: Lazy<HashMap<u8, &'static Opcode>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for op in OPCODES {
        map.insert(op.code, op);
    }
    map
});
