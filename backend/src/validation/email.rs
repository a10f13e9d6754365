//! Mailbox syntax check.
//!
//! Accepts the single-mailbox forms of the standard address grammar:
//! a bare `local@domain`, an angle address `<local@domain>`, or a display
//! name followed by an angle address (`John Doe <john@example.com>`).
//! Local parts may be dot-atoms or quoted strings; domains may be dot-atoms
//! or domain literals. Parenthesised comments, which may nest, count as
//! whitespace. Address lists are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{10FFFF}-]";
const QUOTED: &str = r#""(?:[^"\\\r\n]|\\.)*""#;
const DOMAIN_LITERAL: &str = r"\[[^\[\]\\\s]*\]";

static MAILBOX: Lazy<Regex> = Lazy::new(|| {
    let dot_atom = format!(r"{a}+(?:\.{a}+)*", a = ATEXT);
    let local = format!("(?:{}|{})", dot_atom, QUOTED);
    let domain = format!("(?:{}|{})", dot_atom, DOMAIN_LITERAL);
    let addr = format!(r"{}@\s*{}", local, domain);
    let word = format!("(?:{}+|{})", ATEXT, QUOTED);
    let phrase = format!(r"{w}(?:\s*(?:{w}|\.))*", w = word);
    let mailbox = format!(
        r"^\s*(?:{addr}|(?:{phrase}\s*)?<\s*{addr}\s*>)\s*$",
        addr = addr,
        phrase = phrase
    );
    Regex::new(&mailbox).expect("mailbox pattern is valid")
});

/// Replace every comment with a single space.
///
/// Parentheses inside quoted strings and domain literals are kept. Returns
/// `None` when a comment is never closed.
fn strip_comments(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut in_literal = false;

    while let Some(c) = chars.next() {
        if depth > 0 {
            match c {
                '\\' => {
                    chars.next()?;
                }
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push(' ');
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            '\\' if in_quotes => {
                out.push(c);
                out.push(chars.next()?);
                continue;
            }
            '"' if !in_literal => in_quotes = !in_quotes,
            '[' if !in_quotes => in_literal = true,
            ']' if !in_quotes => in_literal = false,
            '(' if !in_quotes && !in_literal => {
                depth = 1;
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    (depth == 0).then_some(out)
}

/// Check whether `value` is a syntactically valid single mailbox.
pub fn is_valid_mailbox(value: &str) -> bool {
    match strip_comments(value) {
        Some(stripped) => MAILBOX.is_match(&stripped),
        None => false,
    }
}
