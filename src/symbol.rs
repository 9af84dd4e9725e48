// Symbol table
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

/// The role a symbol table row plays.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Code,
    Data,
    External,
    ExternalReference,
    Entry,
}

/// One row of the symbol table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRow {
    pub name: String,
    pub value: u32,
    pub kind: SymbolKind,
}

/// An ordered multi-entry `(name, value, kind)` store.
///
/// Rows are kept sorted by `value` ascending (stable for ties) so that
/// [`SymbolTable::shift`] and ordered emission are cheap. A name may
/// repeat across rows, but only through the combination documented on
/// [`SymbolTable::insert`].
#[derive(Default, Debug)]
pub struct SymbolTable {
    rows: Vec<SymbolRow>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { rows: Vec::new() }
    }

    /// Inserts a new row, keeping rows ordered by `value`.
    ///
    /// Callers are responsible for rejecting duplicate definitions
    /// before calling this; the table itself does not enforce
    /// uniqueness, since `External`, `ExternalReference`, and `Entry`
    /// rows are expected to coexist with a name's defining row.
    pub fn insert(&mut self, name: impl Into<String>, value: u32, kind: SymbolKind) {
        let row = SymbolRow { name: name.into(), value, kind };
        let at = self.rows.partition_point(|r| r.value <= row.value);
        self.rows.insert(at, row);
    }

    /// True if a row with this name exists among `kinds`.
    pub fn contains_kind(&self, name: &str, kinds: &[SymbolKind]) -> bool {
        self.rows.iter().any(|r| r.name == name && kinds.contains(&r.kind))
    }

    /// The first row matching `name` whose kind is in `kinds`, if any.
    pub fn find(&self, name: &str, kinds: &[SymbolKind]) -> Option<&SymbolRow> {
        self.rows.iter().find(|r| r.name == name && kinds.contains(&r.kind))
    }

    /// All rows matching `name` whose kind is in `kinds`.
    pub fn find_all(&self, name: &str, kinds: &[SymbolKind]) -> Vec<&SymbolRow> {
        self.rows.iter().filter(|r| r.name == name && kinds.contains(&r.kind)).collect()
    }

    /// Adds `delta` to the value of every row of kind `kind`.
    ///
    /// Used to relocate `Data` symbols past the final code image once
    /// the first pass knows `icf`. Re-sorts afterward since shifting
    /// can change relative order between shifted and unshifted rows.
    pub fn shift(&mut self, kind: SymbolKind, delta: u32) {
        for row in &mut self.rows {
            if row.kind == kind {
                row.value += delta;
            }
        }
        self.rows.sort_by_key(|r| r.value);
    }

    /// All rows of a given kind, in value order.
    pub fn rows_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &SymbolRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    /// Every row, in value order.
    pub fn rows(&self) -> &[SymbolRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_stay_sorted_by_value() {
        let mut table = SymbolTable::new();
        table.insert("B", 200, SymbolKind::Data);
        table.insert("A", 100, SymbolKind::Code);
        table.insert("C", 150, SymbolKind::Code);
        let values: Vec<u32> = table.rows().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![100, 150, 200]);
    }

    #[test]
    fn a_name_can_carry_both_a_definition_and_an_entry_row() {
        let mut table = SymbolTable::new();
        table.insert("A", 100, SymbolKind::Code);
        table.insert("A", 100, SymbolKind::Entry);
        assert_eq!(table.find_all("A", &[SymbolKind::Code, SymbolKind::Entry]).len(), 2);
    }

    #[test]
    fn shift_moves_only_the_selected_kind() {
        let mut table = SymbolTable::new();
        table.insert("D", 0, SymbolKind::Data);
        table.insert("C", 100, SymbolKind::Code);
        table.shift(SymbolKind::Data, 103);
        assert_eq!(table.find("D", &[SymbolKind::Data]).unwrap().value, 103);
        assert_eq!(table.find("C", &[SymbolKind::Code]).unwrap().value, 100);
    }

    #[test]
    fn find_respects_kind_filter() {
        let mut table = SymbolTable::new();
        table.insert("X", 5, SymbolKind::External);
        assert!(table.find("X", &[SymbolKind::Code, SymbolKind::Data]).is_none());
        assert!(table.find("X", &[SymbolKind::External]).is_some());
    }
}
