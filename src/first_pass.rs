// First pass
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
use crate::instr::{InstructionRecord, Operand};
use crate::lex::{self, MAX_LINE_LENGTH};
use crate::line::Line;
use crate::opcode::{self, Arity, Directive};
use crate::symbol::SymbolKind;
use crate::word::{Are, CodeWord, DataWord, MachineWord};

const DUPLICATE_CHECK: &[SymbolKind] = &[SymbolKind::Code, SymbolKind::Data, SymbolKind::External];

/// Runs the first pass over the expanded line stream, filling the data
/// image completely, the code image's opcode words (and any operand
/// words that do not depend on forward symbol resolution), and
/// registering `Code`/`Data`/`External` symbols.
///
/// Every line is attempted even after an earlier line fails, so a
/// single invocation surfaces every lexical/syntactic/semantic defect
/// it can find.
pub fn run(lines: &[Line], asm: &mut Assembly) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for line in lines {
        if line.text.chars().count() > MAX_LINE_LENGTH {
            diagnostics.push(Diagnostic::new(
                line.file.as_ref(),
                line.number,
                AssemblyError::LineTooLong { max: MAX_LINE_LENGTH },
            ));
            asm.success = false;
            continue;
        }

        match process_line(line, asm) {
            Ok(()) => tracing::trace!(line = line.number, "first pass: ok"),
            Err(error) => {
                tracing::trace!(line = line.number, %error, "first pass: rejected");
                diagnostics.push(Diagnostic::new(line.file.as_ref(), line.number, error));
                asm.success = false;
            }
        }
    }

    diagnostics
}

fn process_line(line: &Line, asm: &mut Assembly) -> Result<(), AssemblyError> {
    if lex::is_blank_or_comment(&line.text) {
        return Ok(());
    }

    let (label, rest) = match lex::extract_label(&line.text)? {
        Some((name, rest)) => (Some(name), rest),
        None => (None, line.text.as_str()),
    };

    let rest = lex::skip_ws(rest);
    if rest.is_empty() {
        return Ok(());
    }

    let first_word = rest.split_whitespace().next().unwrap_or("");

    if let Some(directive_name) = first_word.strip_prefix('.') {
        let directive = Directive::from_str(directive_name)
            .ok_or_else(|| AssemblyError::UnknownDirective(directive_name.to_string()))?;
        let body = lex::skip_ws(&rest[first_word.len()..]);
        return process_directive(directive, label, body, asm);
    }

    let entry = opcode::lookup(first_word)
        .ok_or_else(|| AssemblyError::UnknownMnemonic(first_word.to_string()))?;
    let body = lex::skip_ws(&rest[first_word.len()..]);
    process_instruction(entry, label, body, line, asm)
}

fn check_not_duplicate(name: &str, asm: &Assembly) -> Result<(), AssemblyError> {
    if asm.symbols.contains_kind(name, DUPLICATE_CHECK) {
        return Err(AssemblyError::DuplicateSymbol(name.to_string()));
    }
    Ok(())
}

fn process_directive(
    directive: Directive,
    label: Option<&str>,
    body: &str,
    asm: &mut Assembly,
) -> Result<(), AssemblyError> {
    match directive {
        Directive::Data => {
            let values = parse_integer_list(body)?;
            if values.is_empty() {
                return Err(AssemblyError::DataMissingValue);
            }
            if let Some(name) = label {
                check_not_duplicate(name, asm)?;
                asm.symbols.insert(name, asm.dc, SymbolKind::Data);
            }
            for value in values {
                asm.push_data(value);
            }
            Ok(())
        }
        Directive::String => {
            let text = parse_string_literal(body)?;
            if let Some(name) = label {
                check_not_duplicate(name, asm)?;
                asm.symbols.insert(name, asm.dc, SymbolKind::Data);
            }
            for byte in text.bytes() {
                asm.push_data(byte as i64);
            }
            asm.push_data(0);
            Ok(())
        }
        Directive::Extern => {
            // A label on `.extern` is silently ignored, matching this
            // tool's historical behavior.
            let name = body.split_whitespace().next().unwrap_or("");
            if name.is_empty() {
                return Err(AssemblyError::ExternMissingName);
            }
            lex::validate_label_name(name)?;
            asm.symbols.insert(name, 0, SymbolKind::External);
            Ok(())
        }
        Directive::Entry => {
            if label.is_some() {
                return Err(AssemblyError::LabelOnEntry);
            }
            // Resolution happens entirely in the second pass.
            Ok(())
        }
    }
}

fn process_instruction(
    entry: &'static opcode::OpcodeEntry,
    label: Option<&str>,
    body: &str,
    line: &Line,
    asm: &mut Assembly,
) -> Result<(), AssemblyError> {
    let operands = parse_operands(body)?;
    let (src, dst) = match entry.arity {
        Arity::Zero => {
            if !operands.is_empty() {
                return Err(AssemblyError::TooManyOperands);
            }
            (None, None)
        }
        Arity::One => {
            if operands.is_empty() {
                return Err(AssemblyError::MissingOperand);
            }
            if operands.len() > 1 {
                return Err(AssemblyError::TooManyOperands);
            }
            let mut iter = operands.into_iter();
            (None, Some(iter.next().unwrap()))
        }
        Arity::Two => {
            if operands.len() < 2 {
                return Err(AssemblyError::MissingOperand);
            }
            if operands.len() > 2 {
                return Err(AssemblyError::TooManyOperands);
            }
            let mut iter = operands.into_iter();
            let src = iter.next().unwrap();
            let dst = iter.next().unwrap();
            (Some(src), Some(dst))
        }
    };

    if let Some(op) = &src {
        if !entry.src_modes.contains(&op.addressing()) {
            return Err(AssemblyError::DisallowedAddressing { mnemonic: entry.name });
        }
    }
    if let Some(op) = &dst {
        if !entry.dst_modes.contains(&op.addressing()) {
            return Err(AssemblyError::DisallowedAddressing { mnemonic: entry.name });
        }
    }

    if let Some(name) = label {
        check_not_duplicate(name, asm)?;
        asm.symbols.insert(name, asm.ic, SymbolKind::Code);
    }

    let shared = matches!(
        (&src, &dst),
        (Some(s), Some(d)) if s.addressing().is_register_like() && d.addressing().is_register_like()
    );
    let length: u8 = match (&src, &dst) {
        (None, None) => 1,
        (None, Some(_)) => 2,
        (Some(_), Some(_)) if shared => 2,
        (Some(_), Some(_)) => 3,
        (Some(_), None) => unreachable!("one-operand mnemonics only populate dst"),
    };

    let address = asm.ic;
    let code_word = CodeWord {
        are: Are::Absolute,
        funct: entry.funct,
        dest_register: register_field(&dst),
        dest_addressing: dst.as_ref().map_or(0, |o| o.addressing().code()),
        src_register: register_field(&src),
        src_addressing: src.as_ref().map_or(0, |o| o.addressing().code()),
        opcode: entry.opcode,
    };
    asm.set_code(address, MachineWord::Code { word: code_word, length });
    asm.ic += 1;

    if shared {
        let src_reg = register_number(src.as_ref().unwrap());
        let dst_reg = register_number(dst.as_ref().unwrap());
        asm.set_code(asm.ic, MachineWord::Data { word: DataWord::registers(src_reg, dst_reg) });
        asm.ic += 1;
    } else {
        if let Some(op) = &src {
            emit_follow_on(asm, op, true);
        }
        if let Some(op) = &dst {
            emit_follow_on(asm, op, false);
        }
    }

    asm.records.push(InstructionRecord {
        address,
        mnemonic: entry.mnemonic,
        src,
        dst,
        file: std::rc::Rc::clone(&line.file),
        line: line.number,
    });
    Ok(())
}

/// The primary word's register field for an operand: only a plain
/// `Register` operand populates it; `RegisterIndirect` carries its
/// register number solely in the follow-on word.
fn register_field(operand: &Option<Operand>) -> u8 {
    match operand {
        Some(Operand::Register(n)) => *n,
        _ => 0,
    }
}

fn register_number(operand: &Operand) -> u8 {
    match operand {
        Operand::Register(n) | Operand::RegisterIndirect(n) => *n,
        _ => 0,
    }
}

fn emit_follow_on(asm: &mut Assembly, operand: &Operand, is_src: bool) {
    match operand {
        Operand::Immediate(value) => {
            asm.set_code(asm.ic, MachineWord::Data { word: DataWord::immediate(Are::Absolute, *value) });
            asm.ic += 1;
        }
        Operand::Direct(_) => {
            // Left null; the second pass fills this once the symbol resolves.
            asm.ic += 1;
        }
        Operand::Register(n) | Operand::RegisterIndirect(n) => {
            let word = if is_src { DataWord::registers(*n, 0) } else { DataWord::registers(0, *n) };
            asm.set_code(asm.ic, MachineWord::Data { word });
            asm.ic += 1;
        }
    }
}

/// Splits `text` on commas into operand tokens, rejecting a leading,
/// trailing, doubled, or excess (more than two) comma.
fn parse_operands(text: &str) -> Result<Vec<Operand>, AssemblyError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with(',') {
        return Err(AssemblyError::UnexpectedComma);
    }
    if trimmed.ends_with(',') {
        return Err(AssemblyError::MissingOperand);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() > 2 {
        return Err(AssemblyError::TooManyOperands);
    }
    for part in &parts {
        if part.is_empty() {
            return Err(AssemblyError::ConsecutiveCommas);
        }
    }
    parts.into_iter().map(parse_operand).collect()
}

fn parse_operand(token: &str) -> Result<Operand, AssemblyError> {
    if let Some(digits) = token.strip_prefix('#') {
        return lex::parse_integer(digits)
            .map(Operand::Immediate)
            .ok_or_else(|| AssemblyError::InvalidOperand(token.to_string()));
    }
    if let Some(n) = lex::parse_register_indirect(token) {
        return Ok(Operand::RegisterIndirect(n));
    }
    if let Some(n) = lex::parse_register(token) {
        return Ok(Operand::Register(n));
    }
    if lex::is_identifier(token) {
        return Ok(Operand::Direct(token.to_string()));
    }
    Err(AssemblyError::InvalidOperand(token.to_string()))
}

fn parse_integer_list(text: &str) -> Result<Vec<i64>, AssemblyError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with(',') {
        return Err(AssemblyError::UnexpectedComma);
    }
    if trimmed.ends_with(',') {
        return Err(AssemblyError::MissingOperand);
    }
    trimmed
        .split(',')
        .map(str::trim)
        .map(|tok| {
            if tok.is_empty() {
                Err(AssemblyError::ConsecutiveCommas)
            } else {
                lex::parse_integer(tok).ok_or_else(|| AssemblyError::InvalidInteger(tok.to_string()))
            }
        })
        .collect()
}

fn parse_string_literal(text: &str) -> Result<String, AssemblyError> {
    let text = text.trim();
    let rest = text.strip_prefix('"').ok_or(AssemblyError::StringMissingOpenQuote)?;
    let end = rest.find('"').ok_or(AssemblyError::UnterminatedString)?;
    Ok(rest[..end].to_string())
}
