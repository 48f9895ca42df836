//! Recursive-descent parser for parallel regular expressions.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! expr     := union
//! union    := shuffle ('|' shuffle)*
//! shuffle  := concat  ('&' concat)*
//! concat   := star+
//! star     := atom ('*')?
//! atom     := SYMBOL | '[' IDENT ']' | '(' expr ')'
//! ```
//!
//! Whitespace between tokens is insignificant. A `SYMBOL` is any single
//! character outside the metacharacter set; multi-character symbols are
//! written `[name]`.

use crate::ast::Expr;
use crate::error::{PrexError, Result};

const METACHARACTERS: &[char] = &['|', '&', '*', '(', ')', '[', ']'];

/// Parse a parallel regular expression into its tree.
pub fn parse(input: &str) -> Result<Expr> {
    let mut parser = Parser::new(input);
    let expr = parser.parse_union()?;
    if let Some(c) = parser.peek() {
        return Err(parser.unexpected(&c.to_string()));
    }
    Ok(expr)
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
            end: input.len(),
        }
    }

    /// Peek at the next non-whitespace character.
    fn peek(&mut self) -> Option<char> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
        self.chars.peek().map(|&(i, c)| {
            self.pos = i;
            c
        })
    }

    /// Peek at the next character, whitespace included.
    fn peek_raw(&mut self) -> Option<char> {
        self.chars.peek().map(|&(i, c)| {
            self.pos = i;
            c
        })
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(i, c)| {
            self.pos = i + c.len_utf8();
            c
        })
    }

    fn unexpected(&self, token: &str) -> PrexError {
        PrexError::Parse {
            unexpected_token: token.to_string(),
            position: self.pos,
        }
    }

    fn unexpected_end(&self) -> PrexError {
        PrexError::Parse {
            unexpected_token: "end of input".to_string(),
            position: self.end,
        }
    }

    fn parse_union(&mut self) -> Result<Expr> {
        let mut left = self.parse_shuffle()?;
        while self.peek() == Some('|') {
            self.bump();
            let right = self.parse_shuffle()?;
            left = Expr::union(left, right);
        }
        Ok(left)
    }

    fn parse_shuffle(&mut self) -> Result<Expr> {
        let mut left = self.parse_concat()?;
        while self.peek() == Some('&') {
            self.bump();
            let right = self.parse_concat()?;
            left = Expr::shuffle(left, right);
        }
        Ok(left)
    }

    fn parse_concat(&mut self) -> Result<Expr> {
        // At least one starred atom is required; empty operands are grammar
        // violations, including the empty expression.
        let mut expr = self.parse_star()?;
        while let Some(c) = self.peek() {
            if c == '|' || c == '&' || c == ')' || c == '*' || c == ']' {
                break;
            }
            let right = self.parse_star()?;
            expr = Expr::concat(expr, right);
        }
        Ok(expr)
    }

    fn parse_star(&mut self) -> Result<Expr> {
        let atom = self.parse_atom()?;
        if self.peek() == Some('*') {
            self.bump();
            return Ok(Expr::star(atom));
        }
        Ok(atom)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        match self.peek() {
            None => Err(self.unexpected_end()),
            Some('(') => {
                self.bump();
                let inner = self.parse_union()?;
                match self.peek() {
                    Some(')') => {
                        self.bump();
                        Ok(inner)
                    }
                    Some(c) => Err(self.unexpected(&c.to_string())),
                    None => Err(self.unexpected_end()),
                }
            }
            Some('[') => {
                self.bump();
                self.parse_bracketed()
            }
            Some(c) if METACHARACTERS.contains(&c) => Err(self.unexpected(&c.to_string())),
            Some(c) => {
                self.bump();
                Ok(Expr::Sym(c.to_string()))
            }
        }
    }

    /// Parse the identifier of a `[name]` symbol; the opening bracket has
    /// already been consumed. The identifier is taken verbatim up to the
    /// closing bracket and must be non-empty.
    fn parse_bracketed(&mut self) -> Result<Expr> {
        let mut name = String::new();
        loop {
            match self.peek_raw() {
                None => return Err(self.unexpected_end()),
                Some(']') => {
                    if name.is_empty() {
                        return Err(self.unexpected("]"));
                    }
                    self.bump();
                    return Ok(Expr::Sym(name));
                }
                Some(c) => {
                    self.bump();
                    name.push(c);
                }
            }
        }
    }
}
