//! Postfix tokens and operator kinds.

use std::fmt;

use serde::Serialize;

/// Binary regex operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    /// `.`
    Concat,
    /// `|`
    Alternate,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Concat => '.',
            BinaryOp::Alternate => '|',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(BinaryOp::Concat),
            '|' => Some(BinaryOp::Alternate),
            _ => None,
        }
    }
}

/// Unary (postfix quantifier) regex operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Optional,
}

impl UnaryOp {
    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Star => '*',
            UnaryOp::Plus => '+',
            UnaryOp::Optional => '?',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '*' => Some(UnaryOp::Star),
            '+' => Some(UnaryOp::Plus),
            '?' => Some(UnaryOp::Optional),
            _ => None,
        }
    }
}

/// One single-character token of a postfix expression.
///
/// Every character that is not an operator is a literal operand,
/// whitespace included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Operand(char),
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl Token {
    /// Number of operands the token pops from the builder stack.
    pub fn arity(self) -> usize {
        match self {
            Token::Operand(_) => 0,
            Token::Unary(_) => 1,
            Token::Binary(_) => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Token::Operand(c) => c,
            Token::Binary(op) => op.symbol(),
            Token::Unary(op) => op.symbol(),
        }
    }
}

impl From<char> for Token {
    fn from(c: char) -> Self {
        if let Some(op) = BinaryOp::from_symbol(c) {
            Token::Binary(op)
        } else if let Some(op) = UnaryOp::from_symbol(c) {
            Token::Unary(op)
        } else {
            Token::Operand(c)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Split a postfix expression into tokens, one per `char`.
pub fn tokenize(postfix: &str) -> Vec<Token> {
    postfix.chars().map(Token::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_operator_chars_when_classifying_then_returns_operator_tokens() {
        assert_eq!(Token::from('.'), Token::Binary(BinaryOp::Concat));
        assert_eq!(Token::from('|'), Token::Binary(BinaryOp::Alternate));
        assert_eq!(Token::from('*'), Token::Unary(UnaryOp::Star));
        assert_eq!(Token::from('+'), Token::Unary(UnaryOp::Plus));
        assert_eq!(Token::from('?'), Token::Unary(UnaryOp::Optional));
    }

    #[test]
    fn given_non_operator_chars_when_classifying_then_returns_operands() {
        for c in ['a', 'Z', '0', 'ε', ' ', '('] {
            assert_eq!(Token::from(c), Token::Operand(c));
        }
    }

    #[test]
    fn given_expression_when_tokenizing_then_keeps_order_and_arity() {
        let tokens = tokenize("ab.c|*");
        let arities: Vec<usize> = tokens.iter().map(|t| t.arity()).collect();
        assert_eq!(arities, vec![0, 0, 2, 0, 2, 1]);
        let rendered: String = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, "ab.c|*");
    }
}
