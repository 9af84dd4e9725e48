// fixasm
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

//! A two-pass assembler for a small fixed-width instruction set
//! architecture: macro expansion, symbol resolution, and the code/data
//! image model that ties them together.

pub mod assembler;
pub mod error;
pub mod first_pass;
pub mod instr;
pub mod lex;
pub mod line;
pub mod macroexpand;
pub mod opcode;
pub mod output;
pub mod second_pass;
pub mod symbol;
pub mod word;
