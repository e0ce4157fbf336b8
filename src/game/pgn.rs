//! Reader for a single PGN game: tag pairs plus the SAN tokens of the
//! mainline. Comments, NAGs and variations are skipped.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub sans: Vec<String>,
    pub result: Option<String>,
}

impl PgnGame {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

fn parse_tag(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    let (key, rest) = inner.split_once(char::is_whitespace)?;
    let rest = rest.trim().strip_prefix('"')?;
    let mut value = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.extend(chars.next()),
            '"' => return Some((key.to_string(), value)),
            _ => value.push(c),
        }
    }
    None
}

/// Split movetext into raw tokens, dropping `{}` / `;` comments, `$n` NAGs and
/// `( )` variations (nested).
fn tokenize_movetext(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();
    let flush = |cur: &mut String, tokens: &mut Vec<String>| {
        if !cur.is_empty() {
            tokens.push(std::mem::take(cur));
        }
    };
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush(&mut cur, &mut tokens);
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
            }
            ';' => {
                flush(&mut cur, &mut tokens);
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => {
                flush(&mut cur, &mut tokens);
                depth += 1;
            }
            ')' => {
                cur.clear();
                depth = depth.saturating_sub(1);
            }
            '$' => {
                flush(&mut cur, &mut tokens);
                while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    chars.next();
                }
            }
            c if c.is_whitespace() => {
                if depth == 0 {
                    flush(&mut cur, &mut tokens);
                } else {
                    cur.clear();
                }
            }
            c => {
                if depth == 0 {
                    cur.push(c);
                }
            }
        }
    }
    flush(&mut cur, &mut tokens);
    tokens
}

/// Strip a leading move number (`12.`, `12...`, `12.e4`).
fn strip_move_number(token: &str) -> &str {
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    }
}

pub fn parse_pgn(text: &str) -> Result<PgnGame> {
    let mut game = PgnGame::default();
    let mut movetext = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && movetext.trim().is_empty() {
            let tag = parse_tag(trimmed)
                .ok_or_else(|| Error::Pgn(format!("malformed tag line: {}", trimmed)))?;
            game.tags.push(tag);
        } else if !trimmed.starts_with('%') {
            movetext.push_str(line);
            movetext.push('\n');
        }
    }

    for token in tokenize_movetext(&movetext) {
        if RESULTS.contains(&token.as_str()) {
            game.result = Some(token);
            break;
        }
        let san = strip_move_number(&token);
        if san.is_empty() {
            continue;
        }
        game.sans.push(san.to_string());
    }

    if game.sans.is_empty() && game.tags.is_empty() {
        return Err(Error::Pgn("no game found".into()));
    }
    if game.result.is_none() {
        game.result = game.tag("Result").map(str::to_string);
    }
    Ok(game)
}
