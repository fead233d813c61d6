//! The fixed NMOS 6502 instruction set: mnemonics, addressing modes, and the
//! opcode byte for every legal (mnemonic, mode) combination.

/// A 6502 addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// The number of operand bytes this mode encodes (not counting the opcode byte itself).
    pub const fn operand_len(self) -> usize {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndirectX
            | Self::IndirectY
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

macro_rules! mnemonics {
    ($($variant:ident => $name:literal { $($mode:ident = $opcode:literal),* $(,)? }),* $(,)?) => {
        /// A 6502 mnemonic.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Mnemonic {
            $($variant),*
        }

        impl Mnemonic {
            /// Looks up a mnemonic by its assembly-source name (case-sensitive, uppercase).
            pub fn get(name: &str) -> Option<Self> {
                static MAP: phf::Map<&'static str, Mnemonic> = phf::phf_map! {
                    $($name => Mnemonic::$variant),*
                };
                MAP.get(name).copied()
            }

            /// Returns the canonical name of this mnemonic.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),*
                }
            }

            /// Returns the opcode byte for `self` encoded with addressing mode `mode`, or `None`
            /// if this mnemonic does not support that mode.
            pub fn opcode(self, mode: AddressingMode) -> Option<u8> {
                match self {
                    $(Self::$variant => match mode {
                        $(AddressingMode::$mode => Some($opcode),)*
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }),*
                }
            }

            /// Returns the addressing modes this mnemonic supports, smallest encoding first.
            pub fn modes(self) -> &'static [AddressingMode] {
                match self {
                    $(Self::$variant => &[$(AddressingMode::$mode),*]),*
                }
            }
        }
    };
}

mnemonics! {
    Adc => "ADC" { Immediate = 0x69, ZeroPage = 0x65, ZeroPageX = 0x75, Absolute = 0x6D, AbsoluteX = 0x7D, AbsoluteY = 0x79, IndirectX = 0x61, IndirectY = 0x71 },
    And => "AND" { Immediate = 0x29, ZeroPage = 0x25, ZeroPageX = 0x35, Absolute = 0x2D, AbsoluteX = 0x3D, AbsoluteY = 0x39, IndirectX = 0x21, IndirectY = 0x31 },
    Asl => "ASL" { Accumulator = 0x0A, ZeroPage = 0x06, ZeroPageX = 0x16, Absolute = 0x0E, AbsoluteX = 0x1E },
    Bcc => "BCC" { Relative = 0x90 },
    Bcs => "BCS" { Relative = 0xB0 },
    Beq => "BEQ" { Relative = 0xF0 },
    Bit => "BIT" { ZeroPage = 0x24, Absolute = 0x2C },
    Bmi => "BMI" { Relative = 0x30 },
    Bne => "BNE" { Relative = 0xD0 },
    Bpl => "BPL" { Relative = 0x10 },
    Brk => "BRK" { Implied = 0x00 },
    Bvc => "BVC" { Relative = 0x50 },
    Bvs => "BVS" { Relative = 0x70 },
    Clc => "CLC" { Implied = 0x18 },
    Cld => "CLD" { Implied = 0xD8 },
    Cli => "CLI" { Implied = 0x58 },
    Clv => "CLV" { Implied = 0xB8 },
    Cmp => "CMP" { Immediate = 0xC9, ZeroPage = 0xC5, ZeroPageX = 0xD5, Absolute = 0xCD, AbsoluteX = 0xDD, AbsoluteY = 0xD9, IndirectX = 0xC1, IndirectY = 0xD1 },
    Cpx => "CPX" { Immediate = 0xE0, ZeroPage = 0xE4, Absolute = 0xEC },
    Cpy => "CPY" { Immediate = 0xC0, ZeroPage = 0xC4, Absolute = 0xCC },
    Dec => "DEC" { ZeroPage = 0xC6, ZeroPageX = 0xD6, Absolute = 0xCE, AbsoluteX = 0xDE },
    Dex => "DEX" { Implied = 0xCA },
    Dey => "DEY" { Implied = 0x88 },
    Eor => "EOR" { Immediate = 0x49, ZeroPage = 0x45, ZeroPageX = 0x55, Absolute = 0x4D, AbsoluteX = 0x5D, AbsoluteY = 0x59, IndirectX = 0x41, IndirectY = 0x51 },
    Inc => "INC" { ZeroPage = 0xE6, ZeroPageX = 0xF6, Absolute = 0xEE, AbsoluteX = 0xFE },
    Inx => "INX" { Implied = 0xE8 },
    Iny => "INY" { Implied = 0xC8 },
    Jmp => "JMP" { Absolute = 0x4C, Indirect = 0x6C },
    Jsr => "JSR" { Absolute = 0x20 },
    Lda => "LDA" { Immediate = 0xA9, ZeroPage = 0xA5, ZeroPageX = 0xB5, Absolute = 0xAD, AbsoluteX = 0xBD, AbsoluteY = 0xB9, IndirectX = 0xA1, IndirectY = 0xB1 },
    Ldx => "LDX" { Immediate = 0xA2, ZeroPage = 0xA6, ZeroPageY = 0xB6, Absolute = 0xAE, AbsoluteY = 0xBE },
    Ldy => "LDY" { Immediate = 0xA0, ZeroPage = 0xA4, ZeroPageX = 0xB4, Absolute = 0xAC, AbsoluteX = 0xBC },
    Lsr => "LSR" { Accumulator = 0x4A, ZeroPage = 0x46, ZeroPageX = 0x56, Absolute = 0x4E, AbsoluteX = 0x5E },
    Nop => "NOP" { Implied = 0xEA },
    Ora => "ORA" { Immediate = 0x09, ZeroPage = 0x05, ZeroPageX = 0x15, Absolute = 0x0D, AbsoluteX = 0x1D, AbsoluteY = 0x19, IndirectX = 0x01, IndirectY = 0x11 },
    Pha => "PHA" { Implied = 0x48 },
    Php => "PHP" { Implied = 0x08 },
    Pla => "PLA" { Implied = 0x68 },
    Plp => "PLP" { Implied = 0x28 },
    Rol => "ROL" { Accumulator = 0x2A, ZeroPage = 0x26, ZeroPageX = 0x36, Absolute = 0x2E, AbsoluteX = 0x3E },
    Ror => "ROR" { Accumulator = 0x6A, ZeroPage = 0x66, ZeroPageX = 0x76, Absolute = 0x6E, AbsoluteX = 0x7E },
    Rti => "RTI" { Implied = 0x40 },
    Rts => "RTS" { Implied = 0x60 },
    Sbc => "SBC" { Immediate = 0xE9, ZeroPage = 0xE5, ZeroPageX = 0xF5, Absolute = 0xED, AbsoluteX = 0xFD, AbsoluteY = 0xF9, IndirectX = 0xE1, IndirectY = 0xF1 },
    Sec => "SEC" { Implied = 0x38 },
    Sed => "SED" { Implied = 0xF8 },
    Sei => "SEI" { Implied = 0x78 },
    Sta => "STA" { ZeroPage = 0x85, ZeroPageX = 0x95, Absolute = 0x8D, AbsoluteX = 0x9D, AbsoluteY = 0x99, IndirectX = 0x81, IndirectY = 0x91 },
    Stx => "STX" { ZeroPage = 0x86, ZeroPageY = 0x96, Absolute = 0x8E },
    Sty => "STY" { ZeroPage = 0x84, ZeroPageX = 0x94, Absolute = 0x8C },
    Tax => "TAX" { Implied = 0xAA },
    Tay => "TAY" { Implied = 0xA8 },
    Tsx => "TSX" { Implied = 0xBA },
    Txa => "TXA" { Implied = 0x8A },
    Txs => "TXS" { Implied = 0x9A },
    Tya => "TYA" { Implied = 0x98 },
}

/// MADS-dialect directive keywords recognized outside of mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Directive {
    If,
    Elseif,
    Else,
    Endif,
    Error,
    Byte,
    Word,
    Org,
    Ini,
    Icl,
}

impl Directive {
    pub fn get(name: &str) -> Option<Self> {
        static MAP: phf::Map<&'static str, Directive> = phf::phf_map! {
            ".if" => Directive::If,
            ".elseif" => Directive::Elseif,
            ".else" => Directive::Else,
            ".endif" => Directive::Endif,
            ".error" => Directive::Error,
            ".byte" => Directive::Byte,
            ".word" => Directive::Word,
            "org" => Directive::Org,
            "ini" => Directive::Ini,
            "icl" => Directive::Icl,
        };
        MAP.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::If => ".if",
            Self::Elseif => ".elseif",
            Self::Else => ".else",
            Self::Endif => ".endif",
            Self::Error => ".error",
            Self::Byte => ".byte",
            Self::Word => ".word",
            Self::Org => "org",
            Self::Ini => "ini",
            Self::Icl => "icl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Mnemonic::get("LDA"), Some(Mnemonic::Lda));
        assert_eq!(Mnemonic::get("BRK"), Some(Mnemonic::Brk));
        assert_eq!(Mnemonic::get("xyz"), None);
    }

    #[test]
    fn test_opcode_bytes() {
        assert_eq!(Mnemonic::Lda.opcode(AddressingMode::Immediate), Some(0xA9));
        assert_eq!(Mnemonic::Bne.opcode(AddressingMode::Relative), Some(0xD0));
        assert_eq!(Mnemonic::Bne.opcode(AddressingMode::Absolute), None);
        assert_eq!(Mnemonic::Brk.opcode(AddressingMode::Implied), Some(0x00));
    }

    #[test]
    fn test_operand_len() {
        assert_eq!(AddressingMode::Implied.operand_len(), 0);
        assert_eq!(AddressingMode::ZeroPage.operand_len(), 1);
        assert_eq!(AddressingMode::Absolute.operand_len(), 2);
    }
}
