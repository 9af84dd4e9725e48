// Second pass
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

use crate::assembler::Assembly;
use crate::error::{AssemblyError, Diagnostic};
use crate::lex;
use crate::line::Line;
use crate::symbol::SymbolKind;
use crate::word::{Are, DataWord, MachineWord};

const RESOLVE_KINDS: &[SymbolKind] = &[SymbolKind::Data, SymbolKind::Code, SymbolKind::External];

/// Runs the second pass: relocates `Data` symbols past the final code
/// image, fills every `Direct` operand's follow-on word now that
/// symbols are known, and promotes `.entry`-named symbols to `Entry`
/// rows.
///
/// Operands are resolved from the cached [`InstructionRecord`]s the
/// first pass produced, not by re-parsing `lines`; `lines` is walked
/// only to find `.entry` directives, which carry no other first-pass
/// trace.
///
/// [`InstructionRecord`]: crate::instr::InstructionRecord
pub fn run(lines: &[Line], asm: &mut Assembly) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    asm.symbols.shift(SymbolKind::Data, asm.icf());

    for line in lines {
        if let Err(error) = process_entry_line(line, asm) {
            diagnostics.push(Diagnostic::new(line.file.as_ref(), line.number, error));
            asm.success = false;
        }
    }

    let records = asm.records.clone();
    for record in &records {
        for (address, name) in record.direct_operand_addresses() {
            match resolve_operand(asm, name, address) {
                Ok(word) => {
                    tracing::trace!(line = record.line, symbol = name, "second pass: resolved");
                    asm.set_code(address, word);
                }
                Err(error) => {
                    tracing::trace!(line = record.line, symbol = name, %error, "second pass: unresolved");
                    diagnostics.push(Diagnostic::new(record.file.as_ref(), record.line, error));
                    asm.success = false;
                }
            }
        }
    }

    diagnostics
}

fn resolve_operand(asm: &mut Assembly, name: &str, address: u32) -> Result<MachineWord, AssemblyError> {
    let row = asm
        .symbols
        .find(name, RESOLVE_KINDS)
        .ok_or_else(|| AssemblyError::UndefinedSymbol(name.to_string()))?;

    let is_external = row.kind == SymbolKind::External;
    let are = if is_external { Are::External } else { Are::Relocatable };
    let word = MachineWord::Data { word: DataWord::address(are, row.value as i64) };

    if is_external {
        asm.symbols.insert(name, address, SymbolKind::ExternalReference);
    }

    Ok(word)
}

fn process_entry_line(line: &Line, asm: &mut Assembly) -> Result<(), AssemblyError> {
    if lex::is_blank_or_comment(&line.text) {
        return Ok(());
    }

    let rest = match lex::extract_label(&line.text)? {
        Some((_, rest)) => rest,
        None => line.text.as_str(),
    };
    let rest = lex::skip_ws(rest);

    let Some(rest) = rest.strip_prefix(".entry") else {
        return Ok(());
    };
    let name = lex::skip_ws(rest).split_whitespace().next().unwrap_or("");
    if name.is_empty() {
        return Err(AssemblyError::EntryMissingName);
    }

    if asm.symbols.contains_kind(name, &[SymbolKind::Entry]) {
        return Ok(());
    }

    if let Some(row) = asm.symbols.find(name, &[SymbolKind::Data, SymbolKind::Code]) {
        let value = row.value;
        asm.symbols.insert(name, value, SymbolKind::Entry);
        return Ok(());
    }

    if asm.symbols.contains_kind(name, &[SymbolKind::External]) {
        return Err(AssemblyError::ExternalEntryConflict(name.to_string()));
    }

    Err(AssemblyError::UndefinedSymbol(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(source: &str) -> (Assembly, Vec<Diagnostic>) {
        let out = crate::assembler::assemble("t.am", source);
        (out.assembly, out.diagnostics)
    }

    #[test]
    fn resolves_an_external_jump_and_records_the_reference() {
        let (asm, diags) = assemble(".extern OUTSIDE\njmp OUTSIDE\nstop\n");
        assert!(diags.is_empty(), "{diags:?}");
        let refs = asm.symbols.find_all("OUTSIDE", &[SymbolKind::ExternalReference]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, 101);
    }

    #[test]
    fn promotes_a_data_symbol_to_entry_after_the_shift() {
        let (asm, diags) = assemble("A: .data 1\n.entry A\nstop\n");
        assert!(diags.is_empty(), "{diags:?}");
        let entry = asm.symbols.find("A", &[SymbolKind::Entry]).unwrap();
        assert_eq!(entry.value, 101); // shifted past the one-word code image
    }

    #[test]
    fn rejects_entry_of_an_external_symbol() {
        let (_, diags) = assemble(".extern X\n.entry X\nstop\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].error, AssemblyError::ExternalEntryConflict("X".to_string()));
    }

    #[test]
    fn rejects_undefined_symbol_reference() {
        let (_, diags) = assemble("jmp GHOST\nstop\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].error, AssemblyError::UndefinedSymbol("GHOST".to_string()));
    }
}
