//! Selection line parsing.
//!
//! A selection line carries `<name> [<costs>] : <sub>, <sub>, ...` with the
//! bracket block and the `: ...` suffix both optional, under an optional
//! repeated `". "` depth prefix and an optional `<N>x ` multiplier.

use log::trace;
use nom::{
    character::complete::{char, digit1, space1},
    sequence::tuple,
    IResult,
};

use crate::models::SelectionToken;

const SEPARATOR: &str = ": ";

/// Counts the depth prefix of a selection line and returns the remaining
/// text. Each marker is optional digits followed by `. `; a bare `. `
/// counts 1 and a numbered `N. ` counts N, so `". . Name"` and
/// `"2. Name"` both give 2.
pub fn read_depth_index(raw: &str) -> (usize, &str) {
    let mut rest = raw.trim_start();
    let mut index = 0;

    loop {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(digits_end);

        match tail.strip_prefix(". ") {
            Some(after) => {
                index += digits.parse::<usize>().unwrap_or(1);
                rest = after.trim_start();
            }
            None => break,
        }
    }

    (index, rest)
}

/// Strips a leading `<N>x ` multiplier, returning the count (default 1)
/// and the bare name.
pub fn strip_multiplier(name: &str) -> (u32, &str) {
    match multiplier_prefix(name) {
        Ok((rest, number)) => (number.max(1), rest),
        Err(_) => (1, name),
    }
}

fn multiplier_prefix(input: &str) -> IResult<&str, u32> {
    let (rest, (digits, _, _)) = tuple((digit1, char('x'), space1))(input)?;
    let number = digits.parse::<u32>().unwrap_or(1);
    Ok((rest, number))
}

/// Extracts a trailing `[a, b, c]` block from a name, returning the name
/// without it plus the comma-split entries. Text without such a block is
/// returned unchanged.
pub fn strip_bracket_costs(name: &str) -> (String, Vec<String>) {
    let trimmed = name.trim_end();
    if !trimmed.ends_with(']') {
        return (name.to_string(), Vec::new());
    }

    let Some(open) = trimmed.rfind('[') else {
        return (name.to_string(), Vec::new());
    };

    // Split on comma-space so `1,158pts` survives as one entry
    let inner = &trimmed[open + 1..trimmed.len() - 1];
    let costs = inner
        .split(", ")
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect();

    (trimmed[..open].trim_end().to_string(), costs)
}

/// Parses the raw text of a selection-classified line (depth prefix
/// already removed by `read_depth_index`).
pub fn parse_selection_token(raw: &str) -> SelectionToken {
    // Leading prefix characters only; a trailing dot can be part of a name
    let text = raw
        .trim_start_matches(|c: char| c == '+' || c == '.' || c.is_whitespace())
        .trim_end();

    let mut token = SelectionToken::default();
    match choose_separator(text) {
        Some(at) => {
            let (head, tail) = text.split_at(at);
            let (name, costs) = strip_bracket_costs(head);
            token.name = name;
            token.cost_summary = costs;
            token.sub_entries = tail[SEPARATOR.len()..]
                .split(',')
                .map(|entry| entry.trim_start().to_string())
                .filter(|entry| !entry.is_empty())
                .collect();
        }
        None => {
            let (name, costs) = strip_bracket_costs(text);
            token.name = name;
            token.cost_summary = costs;
        }
    }

    trace!("Parsed selection token: {:?}", token);
    token
}

/// Picks the byte offset of the selection separator, if any.
///
/// The second `": "` is preferred over the first when the text between
/// them holds a bracketed span and no comma outside brackets: that shape
/// means the first colon belongs to the entry's own name
/// (`Strategem: Relics [-1CP]: Extra Relics`). The heuristic is matched
/// to observed export strings and deliberately not generalized further.
fn choose_separator(text: &str) -> Option<usize> {
    let first = text.find(SEPARATOR)?;
    let after_first = first + SEPARATOR.len();

    if let Some(offset) = text[after_first..].find(SEPARATOR) {
        let second = after_first + offset;
        let between = &text[after_first..second];
        if has_bracket_span(between) && !has_comma_outside_brackets(between) {
            return Some(second);
        }
    }

    Some(first)
}

fn has_bracket_span(text: &str) -> bool {
    match (text.find('['), text.rfind(']')) {
        (Some(open), Some(close)) => open < close,
        _ => false,
    }
}

fn has_comma_outside_brackets(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
