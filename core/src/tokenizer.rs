//! Bounded-capacity JSON span tokenizer.
//!
//! # Design
//! A single left-to-right scan classifies the document into flat span
//! tokens; no parse tree is built. Commas, colons, and whitespace are
//! inter-token filler. Strings get minimal escape awareness (a backslash
//! skips the next byte); numbers are a maximal run of sign, digit, decimal,
//! and exponent characters; `true`/`false`/`null` are matched with bounded
//! lookahead.
//!
//! # Container-span contract
//! A container token's `end` is assigned when its matching close delimiter
//! is found, so the half-open range `[start, end)` of an `Object` or
//! `Array` token covers the ranges of all its descendant tokens. The
//! extractor relies on this to step over a whole sibling subtree without
//! recursing: the next sibling is the first following token whose `start`
//! is at or past the current token's `end`.

use crate::error::TokenizeError;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

/// A classified byte range of the tokenized buffer.
///
/// Tokens never own their bytes; they are views into the buffer they were
/// produced from and are only meaningful for that buffer's lifetime.
/// `String` spans include the surrounding quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Tokenize `input` into at most `capacity` tokens.
///
/// The capacity is a hard bound: exceeding it is `TooManyTokens`, never a
/// silently truncated sequence. The input must contain exactly one
/// top-level value.
pub fn tokenize(input: &[u8], capacity: usize) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens: Vec<Token> = Vec::new();
    // Indices of containers still waiting for their close delimiter.
    let mut open: Vec<usize> = Vec::new();
    let mut have_root = false;
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' | b',' | b':' => i += 1,
            b'{' | b'[' => {
                guard_root(&open, have_root, b, i)?;
                let kind = if b == b'{' {
                    TokenKind::Object
                } else {
                    TokenKind::Array
                };
                push(&mut tokens, capacity, kind, i, 0)?;
                open.push(tokens.len() - 1);
                i += 1;
            }
            b'}' | b']' => {
                let idx = open
                    .pop()
                    .ok_or(TokenizeError::InvalidCharacter { byte: b, offset: i })?;
                let expected = if b == b'}' {
                    TokenKind::Object
                } else {
                    TokenKind::Array
                };
                if tokens[idx].kind != expected {
                    return Err(TokenizeError::InvalidCharacter { byte: b, offset: i });
                }
                tokens[idx].end = i + 1;
                if open.is_empty() {
                    have_root = true;
                }
                i += 1;
            }
            b'"' => {
                guard_root(&open, have_root, b, i)?;
                let end = scan_string(input, i)?;
                push(&mut tokens, capacity, TokenKind::String, i, end)?;
                if open.is_empty() {
                    have_root = true;
                }
                i = end;
            }
            b'-' | b'0'..=b'9' => {
                guard_root(&open, have_root, b, i)?;
                let end = scan_number(input, i);
                push(&mut tokens, capacity, TokenKind::Number, i, end)?;
                if open.is_empty() {
                    have_root = true;
                }
                i = end;
            }
            b't' | b'f' | b'n' => {
                guard_root(&open, have_root, b, i)?;
                let (literal, kind) = match b {
                    b't' => (&b"true"[..], TokenKind::Boolean),
                    b'f' => (&b"false"[..], TokenKind::Boolean),
                    _ => (&b"null"[..], TokenKind::Null),
                };
                let end = scan_literal(input, i, literal)?;
                push(&mut tokens, capacity, kind, i, end)?;
                if open.is_empty() {
                    have_root = true;
                }
                i = end;
            }
            _ => return Err(TokenizeError::InvalidCharacter { byte: b, offset: i }),
        }
    }

    if !open.is_empty() || tokens.is_empty() {
        return Err(TokenizeError::UnexpectedEnd);
    }
    Ok(tokens)
}

/// A second top-level value is a stray byte, not a new document.
fn guard_root(
    open: &[usize],
    have_root: bool,
    byte: u8,
    offset: usize,
) -> Result<(), TokenizeError> {
    if open.is_empty() && have_root {
        return Err(TokenizeError::InvalidCharacter { byte, offset });
    }
    Ok(())
}

fn push(
    tokens: &mut Vec<Token>,
    capacity: usize,
    kind: TokenKind,
    start: usize,
    end: usize,
) -> Result<(), TokenizeError> {
    if tokens.len() == capacity {
        return Err(TokenizeError::TooManyTokens(capacity));
    }
    tokens.push(Token { kind, start, end });
    Ok(())
}

/// Returns the offset one past the closing quote.
fn scan_string(input: &[u8], start: usize) -> Result<usize, TokenizeError> {
    let mut i = start + 1;
    while i < input.len() {
        match input[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(TokenizeError::UnexpectedEnd)
}

/// Returns the offset one past the maximal number run.
fn scan_number(input: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < input.len()
        && matches!(input[i], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
    {
        i += 1;
    }
    i
}

fn scan_literal(input: &[u8], start: usize, literal: &[u8]) -> Result<usize, TokenizeError> {
    let end = start + literal.len();
    if end > input.len() {
        return Err(TokenizeError::UnexpectedEnd);
    }
    if &input[start..end] != literal {
        return Err(TokenizeError::InvalidCharacter {
            byte: input[start],
            offset: start,
        });
    }
    Ok(end)
}
