// Macro expansion
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

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Diagnostic;
use crate::line::Line;

/// Maximum number of lines a single macro body may capture. A line
/// beyond this cap is silently dropped; the original tool reused its
/// source-line buffer size for this limit, and that coincidence is
/// preserved here rather than picking a fresh, more sensible number.
pub const MACRO_LINE_CAP: usize = 82;

struct MacroDef {
    lines: Vec<String>,
}

/// Expands `macr`/`endmacr` definitions and invocations in `source`,
/// returning the expanded line stream with its own fresh, contiguous
/// line numbering (invocations are replaced by however many lines
/// their body holds, so the expanded stream's line numbers do not
/// correspond 1:1 with the input).
///
/// Definitions must appear before their first use; nested or
/// self-referential `macr` blocks are not detected and are undefined
/// behavior, matching the tool this one continues.
pub fn expand(file: Rc<str>, source: &str) -> (Vec<Line>, Vec<Diagnostic>) {
    let mut macros: HashMap<String, MacroDef> = HashMap::new();
    let mut current: Option<String> = None;
    let mut out = Vec::new();
    let mut diagnostics = Vec::new();
    let mut number = 0u32;

    for raw in source.lines() {
        let trimmed = raw.trim_start();

        if let Some(name) = trimmed.strip_prefix("macr ").or_else(|| trimmed.strip_prefix("macr\t")) {
            let name = name.trim().to_string();
            macros.insert(name.clone(), MacroDef { lines: Vec::new() });
            current = Some(name);
            continue;
        }

        if trimmed.starts_with("endmacr") {
            current = None;
            continue;
        }

        if let Some(name) = &current {
            let def = macros.get_mut(name).expect("macro was just inserted");
            if def.lines.len() < MACRO_LINE_CAP {
                def.lines.push(raw.to_string());
            } else {
                number += 1;
                diagnostics.push(Diagnostic::new(
                    file.as_ref(),
                    number,
                    crate::error::AssemblyError::MacroTooLong { name: name.clone(), max: MACRO_LINE_CAP },
                ));
            }
            continue;
        }

        let first_word = trimmed.split_whitespace().next().unwrap_or("");
        if let Some(def) = macros.get(first_word) {
            for line in &def.lines {
                number += 1;
                out.push(Line::new(Rc::clone(&file), number, line.clone()));
            }
        } else {
            number += 1;
            out.push(Line::new(Rc::clone(&file), number, raw.to_string()));
        }
    }

    (out, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_a_simple_macro_invocation() {
        let (lines, diags) = expand(
            Rc::from("t.am"),
            "macr GREET\nmov r1, r2\nadd r1, r2\nendmacr\nGREET\nstop\n",
        );
        assert!(diags.is_empty());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["mov r1, r2", "add r1, r2", "stop"]);
    }

    #[test]
    fn renumbers_the_expanded_stream_contiguously() {
        let (lines, _) = expand(Rc::from("t.am"), "macr M\na\nb\nendmacr\nM\nc\n");
        let numbers: Vec<u32> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn lines_outside_any_macro_pass_through_unchanged() {
        let (lines, _) = expand(Rc::from("t.am"), "mov r1, r2\nstop\n");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["mov r1, r2", "stop"]);
    }
}
