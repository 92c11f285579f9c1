#![allow(clippy::module_inception)]

use std::{path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod toolchain;

extern crate regex;

/// A byte offset into a named source file.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Resolves a byte offset to `(line_number, line_text, column)`, where the
/// column counts characters from the start of the line.
///
/// Offsets at or past the end of the source (an error reported at EOF) are
/// clamped onto the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len().saturating_sub(1));

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let byte_column = pos - start;
            let column = line
                .char_indices()
                .take_while(|(index, _)| *index < byte_column)
                .count();
            return (line_number, line.to_string(), column);
        }

        start = end;
        line_number += 1;
    }

    (line_number, String::new(), 0)
}

/// Returns the 1-based line number of an error within `source`.
pub fn line_of(error: &Error, source: &str) -> usize {
    get_line_at_position(source, error.get_position().0).0
}


pub fn display_error(error: &Error, file: &Path, source: &str) {
    /*
        Error: message
        -> main.zen
           |
        20 | let a = #;
           | --------^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {} (line {})", error.get_error_name(), line);
    } else {
        eprintln!(
            "Error: {} (line {}): {}",
            error.get_error_name(),
            line,
            error.get_tip()
        );
    }
    eprintln!("-> {}", file.as_os_str().to_string_lossy());
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
