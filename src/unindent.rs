//! Line filter that removes one level of leading indentation.
//!
//! Meant to be run from an acme window as `|acmefmt unindent` on a selection.

use std::io::{self, BufRead, Write};

/// What counts as one indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentUnit {
    /// A single tab character.
    Tab,
    /// This many spaces.
    Spaces(usize),
}

impl IndentUnit {
    /// `Spaces(width)` when tabs are expanded, `Tab` otherwise.
    pub fn new(tab_expand: bool, width: usize) -> Self {
        if tab_expand { Self::Spaces(width) } else { Self::Tab }
    }

    /// Remove one unit from the start of `line`, if present. Works on raw
    /// bytes so text in any encoding passes through untouched.
    pub fn strip<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        match self {
            Self::Tab => line.strip_prefix(b"\t").unwrap_or(line),
            Self::Spaces(width) => {
                let leading = line.iter().take(*width).take_while(|&&b| b == b' ').count();
                if leading == *width { &line[leading..] } else { line }
            }
        }
    }
}

/// Copy `input` to `output`, stripping one unit from every non-empty line.
/// Line endings are preserved.
pub fn unindent<R: BufRead, W: Write>(mut input: R, mut output: W, unit: &IndentUnit) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let (line, newline) = match buf.strip_suffix(b"\n") {
            Some(line) => (line, true),
            None => (buf.as_slice(), false),
        };
        output.write_all(unit.strip(line))?;
        if newline {
            output.write_all(b"\n")?;
        }
    }
    output.flush()
}
