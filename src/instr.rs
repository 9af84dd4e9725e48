// Parsed operand and instruction records
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

use std::rc::Rc;

use crate::opcode::Mnemonic;
use crate::word::Addressing;

/// A single parsed operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Immediate(i64),
    Direct(String),
    RegisterIndirect(u8),
    Register(u8),
}

impl Operand {
    pub fn addressing(&self) -> Addressing {
        match self {
            Operand::Immediate(_) => Addressing::Immediate,
            Operand::Direct(_) => Addressing::Direct,
            Operand::RegisterIndirect(_) => Addressing::RegisterIndirect,
            Operand::Register(_) => Addressing::Register,
        }
    }

    /// The symbol name this operand references, if it is `Direct`.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Operand::Direct(name) => Some(name),
            _ => None,
        }
    }
}

/// A cached record of one instruction's parse, kept alongside the
/// primary code word so the second pass can resolve `Direct` operands
/// without re-parsing the source line.
#[derive(Clone, Debug)]
pub struct InstructionRecord {
    /// Address (IC value) of the instruction's primary word.
    pub address: u32,
    pub mnemonic: Mnemonic,
    pub src: Option<Operand>,
    pub dst: Option<Operand>,
    /// Stream and line number the instruction came from, kept only so
    /// the second pass can blame an unresolved symbol on the right line.
    pub file: Rc<str>,
    pub line: u32,
}

impl InstructionRecord {
    /// The addresses, in order, of this instruction's follow-on words
    /// that require second-pass resolution (one per `Direct` operand).
    ///
    /// Both operands sharing a single register follow-on word never
    /// affects this: `Direct` is not a register-like mode, so a shared
    /// word never itself needs resolution, and whichever operand *is*
    /// `Direct` still owns its own distinct follow-on word.
    pub fn direct_operand_addresses(&self) -> Vec<(u32, &str)> {
        let mut out = Vec::new();
        let mut addr = self.address + 1;
        let shared = matches!(
            (&self.src, &self.dst),
            (Some(s), Some(d))
                if s.addressing().is_register_like() && d.addressing().is_register_like()
        );

        if let Some(src) = &self.src {
            if let Some(name) = src.symbol_name() {
                out.push((addr, name));
            }
            addr += 1;
        }
        if let Some(dst) = &self.dst {
            if let Some(name) = dst.symbol_name() {
                out.push((addr, name));
            }
        }
        debug_assert!(!shared || out.is_empty(), "Direct operands never participate in a shared register word");
        out
    }
}
