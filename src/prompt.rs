//! Interactive read-answer loop used by the CLI.
//!
//! Input lines are decoded lossily, so a line with invalid UTF-8 is answered
//! like any other query. Only EOF, `exit` or an I/O failure ends the loop.

use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::session::Session;

const BANNER: &str = "\
Energy Management System
==================================================

You can ask questions like:
- What was the peak demand?
- Can you summarize outages by region?
- Tell me about the demand patterns
- What's the gap between supply and demand?

Type 'exit' to quit
--------------------------------------------------";

pub const FAREWELL: &str = "Thank you for using the Energy Management System!";

/// Runs the prompt until `exit` or EOF. Returns the number of answered queries.
#[tracing::instrument(skip_all, fields(surface = ?session.surface()))]
pub fn run<R: BufRead, W: Write>(
    session: &Session,
    mut input: R,
    mut out: W,
) -> std::io::Result<usize> {
    writeln!(out, "{BANNER}")?;

    let mut buf = Vec::new();
    let mut answered = 0usize;

    loop {
        write!(out, "\nEnter your query: ")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if std::str::from_utf8(&buf).is_err() {
            warn!("Query line was not valid UTF-8, decoded lossily");
        }
        let query = line.trim();

        if query.eq_ignore_ascii_case("exit") {
            writeln!(out, "{FAREWELL}")?;
            break;
        }

        let response = session.answer(query);
        answered += 1;

        writeln!(out, "\nResponse:\n{response}")?;
    }

    info!(answered, "Prompt closed");
    Ok(answered)
}
