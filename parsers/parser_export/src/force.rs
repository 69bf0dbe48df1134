//! Force header line parsing.
//!
//! A force line carries `<name> <cost> (<faction>) [<summary>, ...]` after
//! its `++` prefix. The parser is a three-state machine over words; a state
//! that runs out of words before its delimiter leaves its fields unset.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ForceToken;
use crate::words::WordReader;

/// A word "looks like a cost" when it is an optional minus, digits, then
/// optionally more letters/digits (`140pts`, `-3CP`, `6`).
static COST_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+[A-Za-z0-9]*$").unwrap());

pub fn is_cost_word(word: &str) -> bool {
    COST_WORD.is_match(word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForceState {
    Name,
    Faction,
    CostSummary,
}

/// Parses the raw text of a force-classified line.
pub fn parse_force_token(raw: &str) -> ForceToken {
    let text = raw.trim_matches(|c: char| c == '+' || c == '.' || c.is_whitespace());
    let mut words = WordReader::new(text);

    let mut token = ForceToken::default();
    let mut state = ForceState::Name;
    let mut name_words: Vec<&str> = Vec::new();
    let mut faction_words: Vec<&str> = Vec::new();
    let mut summary = SummaryAccumulator::default();

    while let Some(word) = words.read_word() {
        match state {
            ForceState::Name => {
                if is_cost_word(word) {
                    if !name_words.is_empty() {
                        token.name = Some(name_words.join(" "));
                    }
                    token.cost = Some(word.to_string());
                    state = ForceState::Faction;
                } else {
                    name_words.push(word);
                }
            }
            ForceState::Faction => {
                if faction_words.is_empty() && word.starts_with('[') {
                    // No faction on this line; the bracket opens the summary
                    state = ForceState::CostSummary;
                    summary.push_word(word, &mut token.cost_summary);
                    if summary.closed {
                        break;
                    }
                    continue;
                }

                let body = if faction_words.is_empty() {
                    match word.strip_prefix('(') {
                        Some(rest) => rest,
                        // Not a faction opener; keep waiting for one
                        None => continue,
                    }
                } else {
                    word
                };

                if let Some(end) = body.find(')') {
                    faction_words.push(&body[..end]);
                    token.faction = Some(faction_words.join(" "));
                    state = ForceState::CostSummary;
                } else {
                    faction_words.push(body);
                }
            }
            ForceState::CostSummary => {
                summary.push_word(word, &mut token.cost_summary);
                if summary.closed {
                    break;
                }
            }
        }
    }

    // Ran out of words while still naming: the whole line is the name
    if state == ForceState::Name && !name_words.is_empty() {
        token.name = Some(name_words.join(" "));
    }

    trace!("Parsed force token: {:?}", token);
    token
}

/// Accumulates the `[a, b, c]` summary block across words. Entries can
/// span words (`6 PL`); only a word-final `,` or the closing `]`
/// terminates one entry, so `1,158pts` stays a single entry.
#[derive(Debug, Default)]
struct SummaryAccumulator {
    opened: bool,
    closed: bool,
    entry_words: Vec<String>,
}

impl SummaryAccumulator {
    fn push_word(&mut self, word: &str, entries: &mut Vec<String>) {
        let word = if self.opened {
            word
        } else {
            match word.strip_prefix('[') {
                Some(rest) => {
                    self.opened = true;
                    rest
                }
                // Still before the block
                None => return,
            }
        };

        if let Some(piece) = word.strip_suffix(']') {
            self.push_piece(piece);
            self.flush(entries);
            self.closed = true;
        } else if let Some(piece) = word.strip_suffix(',') {
            self.push_piece(piece);
            self.flush(entries);
        } else {
            self.push_piece(word);
        }
    }

    fn push_piece(&mut self, piece: &str) {
        let piece = piece.trim_end_matches(',');
        if !piece.is_empty() {
            self.entry_words.push(piece.to_string());
        }
    }

    fn flush(&mut self, entries: &mut Vec<String>) {
        if !self.entry_words.is_empty() {
            entries.push(self.entry_words.join(" "));
            self.entry_words.clear();
        }
    }
}
