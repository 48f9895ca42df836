//! Expression tree for parallel regular expressions.

/// A parsed parallel regular expression.
///
/// `Shuffle` accepts every interleaving of a word from its left operand with a
/// word from its right operand that preserves each operand's internal order.
/// No algebraic normalization is performed on construction; the tree mirrors
/// the source expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A named symbol.
    Sym(String),
    /// The empty word.
    Empty,
    /// Concatenation (juxtaposition).
    Concat(Box<Expr>, Box<Expr>),
    /// Alternation (`|`).
    Union(Box<Expr>, Box<Expr>),
    /// Shuffle (`&`).
    Shuffle(Box<Expr>, Box<Expr>),
    /// Kleene closure (`*`).
    Star(Box<Expr>),
}

impl Expr {
    pub fn sym(name: impl Into<String>) -> Expr {
        Expr::Sym(name.into())
    }

    pub fn concat(l: Expr, r: Expr) -> Expr {
        Expr::Concat(Box::new(l), Box::new(r))
    }

    pub fn union(l: Expr, r: Expr) -> Expr {
        Expr::Union(Box::new(l), Box::new(r))
    }

    pub fn shuffle(l: Expr, r: Expr) -> Expr {
        Expr::Shuffle(Box::new(l), Box::new(r))
    }

    pub fn star(e: Expr) -> Expr {
        Expr::Star(Box::new(e))
    }
}
