//! Questions asked on the console when a choice was not given on the
//! command line. UTAU runs plugins in a console window, so these are the
//! only way to get input from the user mid-session.

use std::io::{BufRead, Write};

use crate::error::{Result, ToolboxError};

/// Print `question`, then read one line and trim it
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}\n>>> ", question).map_err(ToolboxError::Prompt)?;
    output.flush().map_err(ToolboxError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(ToolboxError::Prompt)?;
    Ok(line.trim().to_string())
}

/// Ask on the process console
pub fn ask_console(question: &str) -> Result<String> {
    let stdin = std::io::stdin();
    ask(&mut stdin.lock(), &mut std::io::stderr(), question)
}

/// Japanese IMEs often leave digits full-width
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

pub fn parse_count(text: &str) -> Option<u32> {
    normalize_digits(text.trim()).parse().ok()
}

/// Only a literal `yes` confirms
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
