// Output serializers
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

use std::fmt::Write as _;
use std::fs;

use crate::assembler::Assembly;
use crate::error::FileError;
use crate::symbol::SymbolKind;
use crate::word::IC_INIT;

/// Renders the `.ob` object listing: a header line of `(icf - IC_INIT,
/// dcf)` followed by one line per image word in ascending address
/// order, code words first, then data words continuing at `icf`.
pub fn render_object(assembly: &Assembly) -> String {
    let icf = assembly.icf();
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", icf - IC_INIT, assembly.dc);

    for (offset, slot) in assembly.code_image.iter().enumerate() {
        let address = IC_INIT + offset as u32;
        let value = slot.as_ref().map_or(0, |w| w.pack());
        let _ = writeln!(out, "{address:07} {value:06o}");
    }

    // Data-image slots are bare 12-bit values (spec §3), not ARE-tagged
    // data words; only code-image follow-on slots carry an ARE tag.
    for (offset, value) in assembly.data_image.iter().enumerate() {
        let address = icf + offset as u32;
        let packed = (*value as u32) & 0x7FFF;
        let _ = writeln!(out, "{address:07} {packed:06o}");
    }

    out
}

/// Renders the `.ext` externals listing: one `<name> <address>` line
/// per `ExternalReference` row, in table order.
pub fn render_externals(assembly: &Assembly) -> String {
    let mut out = String::new();
    for row in assembly.symbols.rows_of_kind(SymbolKind::ExternalReference) {
        let _ = writeln!(out, "{} {:07}", row.name, row.value);
    }
    out
}

/// Renders the `.ent` entries listing: one `<name> <value>` line per
/// `Entry` row, in table order.
pub fn render_entries(assembly: &Assembly) -> String {
    let mut out = String::new();
    for row in assembly.symbols.rows_of_kind(SymbolKind::Entry) {
        let _ = writeln!(out, "{} {:07}", row.name, row.value);
    }
    out
}

/// Writes `contents` to `path`, wrapping any I/O failure as a
/// [`FileError`].
pub fn write_file(path: &str, contents: &str) -> Result<(), FileError> {
    fs::write(path, contents).map_err(|source| FileError::Write { path: path.to_string(), source })
}
