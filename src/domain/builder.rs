//! Postfix-to-tree builder.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{SyntaxNode, SyntaxTree};
use crate::domain::error::{DomainResult, MalformedPostfix};
use crate::domain::token::{tokenize, Token};

/// Reduces a postfix token sequence to a syntax tree with an explicit stack.
///
/// Binary operators pop their right operand first, then the left one, so
/// operand order matches the infix expression (`ab|` is `a|b`).
#[derive(Debug, Default)]
pub struct PostfixBuilder {
    stack: Vec<Index>,
}

impl PostfixBuilder {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Build a tree from tokens.
    ///
    /// Fails fast: no partial tree is returned on error.
    #[instrument(level = "debug", skip(self, tokens), fields(len = tokens.len()))]
    pub fn build(&mut self, tokens: &[Token]) -> DomainResult<SyntaxTree> {
        self.stack.clear();
        let mut tree = SyntaxTree::with_capacity(tokens.len());

        for (position, &token) in tokens.iter().enumerate() {
            let node = match token {
                Token::Operand(c) => SyntaxNode::Operand(c),
                Token::Unary(op) => {
                    let child = self.pop(token, position, 0)?;
                    SyntaxNode::Unary { op, child }
                }
                Token::Binary(op) => {
                    let right = self.pop(token, position, 0)?;
                    let left = self.pop(token, position, 1)?;
                    SyntaxNode::Binary { op, left, right }
                }
            };
            trace!(position, token = %token, depth = self.stack.len(), "reduce");
            let idx = tree.insert_node(node);
            self.stack.push(idx);
        }

        match self.stack.as_slice() {
            [] => Err(MalformedPostfix::Empty.into()),
            [root] => {
                tree.set_root(*root);
                debug!(nodes = tree.len(), depth = tree.depth(), "built syntax tree");
                Ok(tree)
            }
            rest => Err(MalformedPostfix::UnreducedOperands {
                remaining: rest.len(),
            }
            .into()),
        }
    }

    /// Tokenize and build in one step.
    pub fn build_str(&mut self, postfix: &str) -> DomainResult<SyntaxTree> {
        self.build(&tokenize(postfix))
    }

    /// `already_popped` counts operands this operator took before the call,
    /// so the error reports what was on the stack when the operator arrived.
    fn pop(&mut self, token: Token, position: usize, already_popped: usize) -> DomainResult<Index> {
        self.stack.pop().ok_or_else(|| {
            MalformedPostfix::InsufficientOperands {
                operator: token.symbol(),
                position,
                required: token.arity(),
                available: already_popped,
            }
            .into()
        })
    }
}

/// Build a syntax tree from a postfix expression.
pub fn build(postfix: &str) -> DomainResult<SyntaxTree> {
    PostfixBuilder::new().build_str(postfix)
}
