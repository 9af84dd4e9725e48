// Line descriptor
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

/// A single line of the macro-expanded source stream.
///
/// `file` names the stream a diagnostic should blame, shared cheaply
/// across every line of one file via `Rc` rather than copied per line.
/// `number` is the expanded stream's own 1-based line count; it does
/// not correspond to the line number in the file the user wrote, since
/// macro invocations are replaced by however many lines their body
/// holds.
#[derive(Clone, Debug)]
pub struct Line {
    pub file: Rc<str>,
    pub number: u32,
    pub text: String,
}

impl Line {
    pub fn new(file: Rc<str>, number: u32, text: impl Into<String>) -> Self {
        Line { file, number, text: text.into() }
    }
}
