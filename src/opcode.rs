// Instruction and directive tables
//
// fixasm is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// fixasm is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with fixasm.  If not, see <http://www.gnu.org/licenses/>.

use crate::word::Addressing;

/// How many operands a mnemonic takes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
    Zero,
    One,
    Two,
}

/// The sixteen instruction mnemonics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Red,
    Prn,
    Jsr,
    Rts,
    Stop,
}

/// A row of the mnemonic table: the opcode/funct pair an instruction
/// packs into its primary word, its arity, and the addressing modes
/// each operand position accepts (Table A).
pub struct OpcodeEntry {
    pub mnemonic: Mnemonic,
    pub name: &'static str,
    pub opcode: u8,
    pub funct: u8,
    pub arity: Arity,
    pub src_modes: &'static [Addressing],
    pub dst_modes: &'static [Addressing],
}

const IMM_DIR_IND_REG: &[Addressing] = &[
    Addressing::Immediate,
    Addressing::Direct,
    Addressing::RegisterIndirect,
    Addressing::Register,
];
const DIR_IND_REG: &[Addressing] =
    &[Addressing::Direct, Addressing::RegisterIndirect, Addressing::Register];
const DIR_IND: &[Addressing] = &[Addressing::Direct, Addressing::RegisterIndirect];
const NONE: &[Addressing] = &[];

/// The opcode/funct and addressing table. `mov`/`add` share no opcode
/// with anything else; `add`/`sub` share opcode 2 discriminated by
/// `funct`; `clr`/`not`/`inc`/`dec` share opcode 5; `jmp`/`bne`/`jsr`
/// share opcode 9.
pub static OPCODES: &[OpcodeEntry] = &[
    OpcodeEntry { mnemonic: Mnemonic::Mov, name: "mov", opcode: 0, funct: 0, arity: Arity::Two, src_modes: IMM_DIR_IND_REG, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Cmp, name: "cmp", opcode: 1, funct: 0, arity: Arity::Two, src_modes: IMM_DIR_IND_REG, dst_modes: IMM_DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Add, name: "add", opcode: 2, funct: 1, arity: Arity::Two, src_modes: IMM_DIR_IND_REG, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Sub, name: "sub", opcode: 2, funct: 2, arity: Arity::Two, src_modes: IMM_DIR_IND_REG, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Lea, name: "lea", opcode: 3, funct: 0, arity: Arity::Two, src_modes: DIR_IND, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Clr, name: "clr", opcode: 5, funct: 1, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Not, name: "not", opcode: 5, funct: 2, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Inc, name: "inc", opcode: 5, funct: 3, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Dec, name: "dec", opcode: 5, funct: 4, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Jmp, name: "jmp", opcode: 9, funct: 1, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND },
    OpcodeEntry { mnemonic: Mnemonic::Bne, name: "bne", opcode: 9, funct: 2, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND },
    OpcodeEntry { mnemonic: Mnemonic::Red, name: "red", opcode: 6, funct: 0, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Prn, name: "prn", opcode: 7, funct: 0, arity: Arity::One, src_modes: NONE, dst_modes: IMM_DIR_IND_REG },
    OpcodeEntry { mnemonic: Mnemonic::Jsr, name: "jsr", opcode: 9, funct: 3, arity: Arity::One, src_modes: NONE, dst_modes: DIR_IND },
    OpcodeEntry { mnemonic: Mnemonic::Rts, name: "rts", opcode: 14, funct: 0, arity: Arity::Zero, src_modes: NONE, dst_modes: NONE },
    OpcodeEntry { mnemonic: Mnemonic::Stop, name: "stop", opcode: 15, funct: 0, arity: Arity::Zero, src_modes: NONE, dst_modes: NONE },
];

impl Mnemonic {
    /// Looks up a mnemonic by its textual name.
    pub fn from_str(word: &str) -> Option<Mnemonic> {
        OPCODES.iter().find(|e| e.name == word).map(|e| e.mnemonic)
    }

    /// The table row describing this mnemonic's opcode, funct, arity,
    /// and permitted addressing modes.
    pub fn entry(self) -> &'static OpcodeEntry {
        OPCODES.iter().find(|e| e.mnemonic == self).expect("every Mnemonic has a table row")
    }
}

/// Looks up a mnemonic's full table row directly by name.
pub fn lookup(word: &str) -> Option<&'static OpcodeEntry> {
    OPCODES.iter().find(|e| e.name == word)
}

/// The four assembler directives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Directive {
    Data,
    String,
    Extern,
    Entry,
}

impl Directive {
    pub fn from_str(word: &str) -> Option<Directive> {
        match word {
            "data" => Some(Directive::Data),
            "string" => Some(Directive::String),
            "extern" => Some(Directive::Extern),
            "entry" => Some(Directive::Entry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_opcodes_are_discriminated_by_funct() {
        let add = lookup("add").unwrap();
        let sub = lookup("sub").unwrap();
        assert_eq!(add.opcode, sub.opcode);
        assert_ne!(add.funct, sub.funct);

        let clr = lookup("clr").unwrap();
        let not = lookup("not").unwrap();
        let inc = lookup("inc").unwrap();
        let dec = lookup("dec").unwrap();
        assert_eq!([clr.opcode, not.opcode, inc.opcode, dec.opcode], [5; 4]);

        let jmp = lookup("jmp").unwrap();
        let bne = lookup("bne").unwrap();
        let jsr = lookup("jsr").unwrap();
        assert_eq!([jmp.opcode, bne.opcode, jsr.opcode], [9; 3]);
    }

    #[test]
    fn unknown_mnemonic_is_none() {
        assert!(lookup("xyz").is_none());
        assert!(Mnemonic::from_str("xyz").is_none());
    }

    #[test]
    fn directives_are_recognized() {
        assert_eq!(Directive::from_str("data"), Some(Directive::Data));
        assert_eq!(Directive::from_str("entry"), Some(Directive::Entry));
        assert_eq!(Directive::from_str("foo"), None);
    }

    #[test]
    fn zero_operand_mnemonics_permit_no_addressing() {
        let stop = lookup("stop").unwrap();
        assert!(stop.src_modes.is_empty());
        assert!(stop.dst_modes.is_empty());
    }
}
