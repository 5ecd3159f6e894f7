//! Evaluation of `//go:build` constraint expressions.
//!
//! Grammar: `expr = and ("||" and)*`, `and = unary ("&&" unary)*`,
//! `unary = "!" unary | "(" expr ")" | tag`.

use std::collections::BTreeSet;

/// Go releases whose `go1.N` tags the host is assumed to satisfy.
const GO_MINOR_RELEASES: u32 = 24;

/// Errors from malformed constraint expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    /// An unexpected character.
    #[error("unexpected character {0:?} in build constraint")]
    UnexpectedChar(char),
    /// Expression ended early or had trailing tokens.
    #[error("malformed build constraint: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String),
    Not,
    And,
    Or,
    Open,
    Close,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ConstraintError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '&' | '|' => {
                chars.next();
                if chars.next() != Some(c) {
                    return Err(ConstraintError::UnexpectedChar(c));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        tag.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Tag(tag));
            }
            other => return Err(ConstraintError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    tags: &'a BTreeSet<String>,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn or(&mut self) -> Result<bool, ConstraintError> {
        let mut value = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            value |= self.and()?;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<bool, ConstraintError> {
        let mut value = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            value &= self.unary()?;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<bool, ConstraintError> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ConstraintError::Malformed("unexpected end of expression".into()))?;
        self.pos += 1;

        match token {
            Token::Not => Ok(!self.unary()?),
            Token::Open => {
                let value = self.or()?;
                if self.peek() != Some(&Token::Close) {
                    return Err(ConstraintError::Malformed("missing ')'".into()));
                }
                self.pos += 1;
                Ok(value)
            }
            Token::Tag(tag) => Ok(self.tags.contains(&tag)),
            other => Err(ConstraintError::Malformed(format!("unexpected {other:?}"))),
        }
    }
}

/// Evaluates a constraint expression against a tag set.
///
/// # Errors
///
/// Returns an error if the expression does not parse.
pub fn evaluate(expr: &str, tags: &BTreeSet<String>) -> Result<bool, ConstraintError> {
    let tokens = tokenize(expr)?;
    let mut evaluator = Evaluator {
        tokens: &tokens,
        pos: 0,
        tags,
    };
    let value = evaluator.or()?;
    if evaluator.pos != tokens.len() {
        return Err(ConstraintError::Malformed("trailing tokens".into()));
    }
    Ok(value)
}

/// Tags satisfied by the host: operating system, architecture, `gc`,
/// `cgo`, `unix` where it applies, and every `go1.N` release tag, plus
/// `extra`.
#[must_use]
pub fn host_tags(extra: &[String]) -> BTreeSet<String> {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    };

    let mut tags: BTreeSet<String> = [os, arch, "gc", "cgo"]
        .into_iter()
        .map(String::from)
        .collect();
    if cfg!(unix) {
        tags.insert("unix".to_string());
    }
    tags.extend((1..=GO_MINOR_RELEASES).map(|minor| format!("go1.{minor}")));
    tags.extend(extra.iter().cloned());
    tags
}
