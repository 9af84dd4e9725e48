// fixasm CLI
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

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use fixasm::error::{self, FileError};
use fixasm::output;
use tracing::{debug, info_span};
use tracing_subscriber::EnvFilter;

/// Assembles one or more source files into object, externals, and
/// entries listings.
#[derive(Parser, Debug)]
#[command(name = "fixasm", about = "A two-pass assembler for a small fixed-width ISA")]
struct Cli {
    /// Basenames (without extension) of the `.as` files to assemble.
    #[arg(required = true)]
    files: Vec<String>,

    /// Raise logging verbosity; repeat for more detail, or set RUST_LOG directly.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap's own exit code for usage errors is 2; this tool's
            // contract reserves 1 for argument-parsing failure.
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose);

    for basename in &cli.files {
        if let Err(error) = assemble_one(basename) {
            eprintln!("{error}");
        }
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "fixasm=info",
        1 => "fixasm=debug",
        _ => "fixasm=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Runs the full pipeline for one basename: reads `<basename>.as`,
/// writes `<basename>.am`, and on success writes `.ob`/`.ext`/`.ent`.
///
/// Per-line diagnostics are reported to stderr as they're produced;
/// the `Err` return here is reserved for resource failures that abort
/// the whole file.
fn assemble_one(basename: &str) -> Result<(), FileError> {
    let span = info_span!("assemble", file = basename);
    let _enter = span.enter();

    let source_path = format!("{basename}.as");
    let source = fs::read_to_string(&source_path)
        .map_err(|source| FileError::OpenSource { path: source_path.clone(), source })?;

    let expanded_path = format!("{basename}.am");
    let result = fixasm::assembler::assemble(&expanded_path, &source);
    error::report_all(&result.diagnostics);

    output::write_file(&expanded_path, &result.expanded_text())?;

    if !result.success() {
        debug!("assembly failed; suppressing object file generation");
        return Ok(());
    }

    output::write_file(&format!("{basename}.ob"), &output::render_object(&result.assembly))?;
    output::write_file(&format!("{basename}.ext"), &output::render_externals(&result.assembly))?;
    output::write_file(&format!("{basename}.ent"), &output::render_entries(&result.assembly))?;

    Ok(())
}

