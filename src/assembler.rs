// Per-file orchestration
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

use crate::error::Diagnostic;
use crate::first_pass;
use crate::instr::InstructionRecord;
use crate::line::Line;
use crate::macroexpand;
use crate::second_pass;
use crate::symbol::SymbolTable;
use crate::word::{MachineWord, IC_INIT, IMAGE_CAPACITY};

/// Per-file mutable state shared by both passes: the two images, the
/// symbol table, and the cached per-instruction parse records.
///
/// Owned entirely by [`assemble`]; the first pass borrows it mutably
/// to populate it, the second pass borrows it mutably to resolve it,
/// and a successful run hands it, read-only, to the serializers.
pub struct Assembly {
    pub code_image: Vec<Option<MachineWord>>,
    pub data_image: Vec<i64>,
    pub symbols: SymbolTable,
    pub records: Vec<InstructionRecord>,
    pub ic: u32,
    pub dc: u32,
    pub success: bool,
}

impl Assembly {
    pub fn new() -> Self {
        Assembly {
            code_image: Vec::with_capacity(IMAGE_CAPACITY),
            data_image: Vec::new(),
            symbols: SymbolTable::new(),
            records: Vec::new(),
            ic: IC_INIT,
            dc: 0,
            success: true,
        }
    }

    /// Writes `word` at the code-image slot for `address`, growing the
    /// image as needed.
    pub fn set_code(&mut self, address: u32, word: MachineWord) {
        let index = (address - IC_INIT) as usize;
        if index >= self.code_image.len() {
            self.code_image.resize(index + 1, None);
        }
        self.code_image[index] = Some(word);
    }

    /// Appends one 12-bit data value, advancing `dc`.
    pub fn push_data(&mut self, value: i64) {
        self.data_image.push(value);
        self.dc += 1;
    }

    /// `icf`: the final instruction counter, one past the last code word.
    ///
    /// This is `ic` itself, frozen once the first pass finishes; the
    /// second pass only fills existing gaps and never advances `ic`.
    pub fn icf(&self) -> u32 {
        self.ic
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

/// The fully assembled state of one input file, ready for the output
/// serializers.
pub struct AssemblyOutput {
    /// The macro-expanded line stream, kept so callers can write out
    /// the intermediate `.am` file alongside the final images.
    pub lines: Vec<Line>,
    pub assembly: Assembly,
    pub diagnostics: Vec<Diagnostic>,
}

impl AssemblyOutput {
    /// True only when neither pass recorded a failure; callers must
    /// suppress output-file generation otherwise.
    pub fn success(&self) -> bool {
        self.assembly.success
    }

    /// The expanded source text, one line per entry, newline-terminated.
    pub fn expanded_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

/// Runs the full pipeline — macro expansion, first pass, second pass —
/// over one file's source text.
///
/// `file` names the stream for diagnostics (conventionally the `.am`
/// basename); `source` is the raw `.as` contents.
pub fn assemble(file: &str, source: &str) -> AssemblyOutput {
    let file: Rc<str> = Rc::from(file);

    tracing::debug!("expanding macros");
    let (lines, mut diagnostics) = macroexpand::expand(Rc::clone(&file), source);
    tracing::debug!(lines = lines.len(), "macro expansion complete");

    let mut assembly = Assembly::new();
    tracing::debug!("running first pass");
    diagnostics.extend(first_pass::run(&lines, &mut assembly));
    tracing::debug!(icf = assembly.icf(), dcf = assembly.dc, "first pass complete");

    // The first pass leaves a trailing `Direct`-operand follow-on word
    // unset until the second pass resolves it; make sure the image is
    // already sized to `icf` so that final slot exists to be filled.
    let code_len = (assembly.ic - IC_INIT) as usize;
    if assembly.code_image.len() < code_len {
        assembly.code_image.resize(code_len, None);
    }

    tracing::debug!("running second pass");
    diagnostics.extend(second_pass::run(&lines, &mut assembly));
    tracing::debug!(success = assembly.success, "second pass complete");

    AssemblyOutput { lines, assembly, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn scenario_minimal_stop() {
        let out = assemble("t.am", "stop\n");
        assert!(out.success());
        assert_eq!(out.assembly.icf(), 101);
        assert_eq!(out.assembly.dc, 0);
    }

    #[test]
    fn scenario_immediate_and_label() {
        let out = assemble("t.am", "X: mov #5, r3\nstop\n");
        assert!(out.success());
        let x = out.assembly.symbols.find("X", &[SymbolKind::Code]).unwrap();
        assert_eq!(x.value, 100);
        assert_eq!(out.assembly.icf(), 103);
    }

    #[test]
    fn scenario_two_registers_share_a_word() {
        let out = assemble("t.am", "add r1, r2\nstop\n");
        assert!(out.success());
        assert_eq!(out.assembly.icf(), 103);
    }

    #[test]
    fn scenario_data_and_string() {
        let out = assemble("t.am", "LBL: .data 7, -1\nMSG: .string \"hi\"\n");
        assert!(out.success());
        assert_eq!(out.assembly.dc, 5);
        let lbl = out.assembly.symbols.find("LBL", &[SymbolKind::Data]).unwrap();
        assert_eq!(lbl.value, out.assembly.icf());
        let msg = out.assembly.symbols.find("MSG", &[SymbolKind::Data]).unwrap();
        assert_eq!(msg.value, out.assembly.icf() + 2);
    }

    #[test]
    fn scenario_external_use() {
        let out = assemble("t.am", ".extern OUTSIDE\njmp OUTSIDE\nstop\n");
        assert!(out.success());
        let refs = out.assembly.symbols.find_all("OUTSIDE", &[SymbolKind::ExternalReference]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, 101);
    }

    #[test]
    fn scenario_entry_of_data() {
        let out = assemble("t.am", "A: .data 1\n.entry A\nstop\n");
        assert!(out.success());
        let entry = out.assembly.symbols.find("A", &[SymbolKind::Entry]).unwrap();
        assert_eq!(entry.value, out.assembly.icf());
        assert_eq!(out.assembly.dc, 1);
    }
}

/// Property-based tests over the invariants of the specification's
/// testable-properties section: every successful assembly's `icf` must
/// equal the sum of its primary words' `length`, every such `length`
/// must fall in `1..=3`, and reassembling identical source must be
/// idempotent.
#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    /// Builds a program of `count` two-register `add` instructions
    /// followed by `stop`, clamping each generated byte into `0..=7`.
    fn program(regs: &[(u8, u8)]) -> String {
        let mut source = String::new();
        for (a, b) in regs {
            source.push_str(&format!("add r{}, r{}\n", a % 8, b % 8));
        }
        source.push_str("stop\n");
        source
    }

    #[quickcheck]
    fn icf_equals_sum_of_primary_word_lengths(regs: Vec<(u8, u8)>) -> TestResult {
        if regs.len() > 64 {
            return TestResult::discard();
        }
        let out = assemble("t.am", &program(&regs));
        if !out.success() {
            return TestResult::failed();
        }
        let sum: u32 = out
            .assembly
            .code_image
            .iter()
            .filter_map(|slot| slot.as_ref())
            .map(|word| word.length() as u32)
            .sum();
        TestResult::from_bool(sum == out.assembly.icf() - IC_INIT)
    }

    #[quickcheck]
    fn every_primary_word_length_is_one_two_or_three(regs: Vec<(u8, u8)>) -> TestResult {
        if regs.len() > 64 {
            return TestResult::discard();
        }
        let out = assemble("t.am", &program(&regs));
        if !out.success() {
            return TestResult::failed();
        }
        let ok = out.assembly.code_image.iter().filter_map(|slot| slot.as_ref()).all(|word| match word {
            MachineWord::Code { length, .. } => (1..=3).contains(length),
            MachineWord::Data { .. } => true,
        });
        TestResult::from_bool(ok)
    }

    #[quickcheck]
    fn reassembling_identical_source_is_idempotent(regs: Vec<(u8, u8)>) -> TestResult {
        if regs.len() > 64 {
            return TestResult::discard();
        }
        let source = program(&regs);
        let first = assemble("t.am", &source);
        let second = assemble("t.am", &source);
        if !first.success() || !second.success() {
            return TestResult::discard();
        }
        let same_object = crate::output::render_object(&first.assembly) == crate::output::render_object(&second.assembly);
        let same_externals =
            crate::output::render_externals(&first.assembly) == crate::output::render_externals(&second.assembly);
        let same_entries =
            crate::output::render_entries(&first.assembly) == crate::output::render_entries(&second.assembly);
        TestResult::from_bool(same_object && same_externals && same_entries)
    }

    #[quickcheck]
    fn entry_row_shares_its_defining_symbols_value(value: i32) -> TestResult {
        let source = format!("A: .data {value}\n.entry A\nstop\n");
        let out = assemble("t.am", &source);
        if !out.success() {
            return TestResult::discard();
        }
        let data_value = out.assembly.symbols.find("A", &[SymbolKind::Data]).unwrap().value;
        let entry_value = out.assembly.symbols.find("A", &[SymbolKind::Entry]).unwrap().value;
        TestResult::from_bool(data_value == entry_value)
    }
}
