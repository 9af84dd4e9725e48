// Errors
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

use std::fmt;

use thiserror::Error;

/// A diagnosable defect in a single source line.
///
/// Every variant maps to exactly one line of source; a pass that
/// encounters one of these abandons the line but keeps processing the
/// rest of the file, per the taxonomy in the specification's error
/// handling section.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("line exceeds {max} characters")]
    LineTooLong { max: usize },

    #[error("malformed label")]
    MalformedLabel,

    #[error("label exceeds {max} characters")]
    LabelTooLong { max: usize },

    #[error("'{0}' is a reserved word and cannot be used as a label")]
    ReservedWord(String),

    #[error("unknown directive '.{0}'")]
    UnknownDirective(String),

    #[error("unknown instruction '{0}'")]
    UnknownMnemonic(String),

    #[error("expected an integer, found '{0}'")]
    InvalidInteger(String),

    #[error("unexpected comma")]
    UnexpectedComma,

    #[error("consecutive commas")]
    ConsecutiveCommas,

    #[error("missing operand")]
    MissingOperand,

    #[error("too many operands")]
    TooManyOperands,

    #[error("string literal is missing its opening quote")]
    StringMissingOpenQuote,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("'{0}' is not a valid operand")]
    InvalidOperand(String),

    #[error("addressing mode not permitted here for '{mnemonic}'")]
    DisallowedAddressing { mnemonic: &'static str },

    #[error("symbol '{0}' is already defined")]
    DuplicateSymbol(String),

    #[error("undefined symbol '{0}'")]
    UndefinedSymbol(String),

    #[error("symbol '{0}' is declared external and cannot also be an entry")]
    ExternalEntryConflict(String),

    #[error("a label on '.entry' is not permitted")]
    LabelOnEntry,

    #[error("'.entry' requires a symbol name")]
    EntryMissingName,

    #[error("'.extern' requires a symbol name")]
    ExternMissingName,

    #[error("'.data' requires at least one integer value")]
    DataMissingValue,

    #[error("macro '{name}' exceeded the maximum of {max} lines; the remainder was dropped")]
    MacroTooLong { name: String, max: usize },
}

/// A resource failure that aborts processing of an entire file, rather
/// than a single line.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot open '{path}' for reading")]
    OpenSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open '{path}' for writing")]
    OpenOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing '{path}'")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single diagnosable event, tied to the source line that caused it.
///
/// `file` names the stream the line came from (the macro-expanded
/// `.am` stream, per the pipeline in §2), not necessarily the original
/// `.as` file the user wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub error: AssemblyError,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: u32, error: AssemblyError) -> Self {
        Diagnostic { file: file.into(), line, error }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error In {}:{}: {}", self.file, self.line, self.error)
    }
}

/// Writes a single diagnostic line to standard error in the one format
/// every caller must agree on: `Error In <file>:<line>: <message>`.
///
/// This is the single reporting operation the rest of the pipeline
/// funnels through; nothing else formats a diagnostic line directly.
pub fn report(diagnostic: &Diagnostic) {
    eprintln!("{diagnostic}");
}

/// Reports every diagnostic in file order.
pub fn report_all(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        report(d);
    }
}
