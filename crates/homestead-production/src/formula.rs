//! Sandboxed arithmetic evaluator for production formulas.
//!
//! A production formula is data, not code: a textual expression over the
//! activity's named capacity contributions, e.g.
//! `min(wood, stone, labor, land)`. It is parsed once, at activity
//! construction, into a small AST and evaluated per `perform` call with
//! checked [`Decimal`] arithmetic. No dynamic code execution of any kind.
//!
//! Grammar (standard precedence, left associative):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | IDENT | IDENT '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! The only callable functions are `min` and `max`, each taking one or
//! more arguments. A bare identifier is a variable reference, resolved
//! against the contribution bindings at evaluation time.

use std::collections::BTreeMap;
use std::iter::Peekable;

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur parsing or evaluating a production formula.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    /// The formula contains a character outside the grammar.
    #[error("unexpected character '{ch}' in formula")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
    },

    /// A numeric literal failed to parse as a decimal.
    #[error("invalid number '{text}' in formula")]
    InvalidNumber {
        /// The literal as written.
        text: String,
    },

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token '{token}' in formula")]
    UnexpectedToken {
        /// A description of the offending token.
        token: String,
    },

    /// The formula ended mid-expression.
    #[error("formula ended unexpectedly")]
    UnexpectedEnd,

    /// A function other than `min` or `max` was called.
    #[error("unknown function '{name}' (only 'min' and 'max' are available)")]
    UnknownFunction {
        /// The function name as written.
        name: String,
    },

    /// The formula references a variable with no bound contribution.
    #[error("formula references unknown variable '{name}'")]
    UnknownVariable {
        /// The unbound variable name.
        name: String,
    },

    /// Arithmetic overflow or division by zero during evaluation.
    #[error("arithmetic overflow evaluating formula")]
    Arithmetic,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A lexical token of the formula grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(Decimal),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl Token {
    /// Human-readable rendering for error messages.
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => String::from("+"),
            Self::Minus => String::from("-"),
            Self::Star => String::from("*"),
            Self::Slash => String::from("/"),
            Self::LParen => String::from("("),
            Self::RParen => String::from(")"),
            Self::Comma => String::from(","),
        }
    }
}

/// Split the formula text into tokens.
fn lex(text: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&digit) = chars.peek() {
                    if digit.is_ascii_digit() || digit == '.' {
                        literal.push(digit);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let Ok(value) = literal.parse::<Decimal>() else {
                    return Err(FormulaError::InvalidNumber { text: literal });
                };
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&letter) = chars.peek() {
                    if letter.is_ascii_alphanumeric() || letter == '_' {
                        ident.push(letter);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(FormulaError::UnexpectedChar { ch: other }),
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

/// The callable functions of the formula grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Min,
    Max,
}

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A node of the parsed formula.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Number(Decimal),
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive-descent parser over the token stream.
struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.tokens.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.tokens.next();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.tokens.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.tokens.next();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaError> {
        if matches!(self.tokens.peek(), Some(Token::Minus)) {
            self.tokens.next();
            let inner = self.parse_unary()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        match self.tokens.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Ident(name)) => {
                if matches!(self.tokens.peek(), Some(Token::LParen)) {
                    self.tokens.next();
                    self.parse_call(&name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.tokens.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        token: other.describe(),
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(other) => Err(FormulaError::UnexpectedToken {
                token: other.describe(),
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    /// Parse a call's argument list; the opening paren is already consumed.
    fn parse_call(&mut self, name: &str) -> Result<Expr, FormulaError> {
        let func = match name {
            "min" => Func::Min,
            "max" => Func::Max,
            other => {
                return Err(FormulaError::UnknownFunction {
                    name: String::from(other),
                });
            }
        };

        let mut args = vec![self.parse_expr()?];
        loop {
            match self.tokens.next() {
                Some(Token::Comma) => args.push(self.parse_expr()?),
                Some(Token::RParen) => break,
                Some(other) => {
                    return Err(FormulaError::UnexpectedToken {
                        token: other.describe(),
                    });
                }
                None => return Err(FormulaError::UnexpectedEnd),
            }
        }
        Ok(Expr::Call { func, args })
    }

    /// Reject trailing tokens after a complete expression.
    fn finish(mut self) -> Result<(), FormulaError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(other) => Err(FormulaError::UnexpectedToken {
                token: other.describe(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Formula
// ---------------------------------------------------------------------------

/// A parsed production formula, ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    root: Expr,
    source: String,
}

impl Formula {
    /// Parse a formula from its textual form.
    ///
    /// # Errors
    ///
    /// Returns a [`FormulaError`] describing the first lexical or
    /// syntactic problem.
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        let tokens = lex(text)?;
        let mut parser = Parser::new(tokens);
        let root = parser.parse_expr()?;
        parser.finish()?;
        Ok(Self {
            root,
            source: String::from(text),
        })
    }

    /// Evaluate the formula against the named contribution bindings.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::UnknownVariable`] for an unbound variable
    /// reference and [`FormulaError::Arithmetic`] on overflow or division
    /// by zero.
    pub fn evaluate(&self, bindings: &BTreeMap<String, Decimal>) -> Result<Decimal, FormulaError> {
        evaluate_expr(&self.root, bindings)
    }

    /// The formula's source text, as written in the catalog.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl core::fmt::Display for Formula {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Evaluate one AST node.
fn evaluate_expr(
    expr: &Expr,
    bindings: &BTreeMap<String, Decimal>,
) -> Result<Decimal, FormulaError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Variable(name) => {
            bindings
                .get(name)
                .copied()
                .ok_or_else(|| FormulaError::UnknownVariable {
                    name: name.clone(),
                })
        }
        Expr::Negate(inner) => {
            let value = evaluate_expr(inner, bindings)?;
            Decimal::ZERO
                .checked_sub(value)
                .ok_or(FormulaError::Arithmetic)
        }
        Expr::Binary { op, lhs, rhs } => {
            let left = evaluate_expr(lhs, bindings)?;
            let right = evaluate_expr(rhs, bindings)?;
            let result = match op {
                BinaryOp::Add => left.checked_add(right),
                BinaryOp::Sub => left.checked_sub(right),
                BinaryOp::Mul => left.checked_mul(right),
                BinaryOp::Div => left.checked_div(right),
            };
            result.ok_or(FormulaError::Arithmetic)
        }
        Expr::Call { func, args } => {
            let mut values = args.iter().map(|arg| evaluate_expr(arg, bindings));
            let first = values.next().ok_or(FormulaError::UnexpectedEnd)??;
            values.try_fold(first, |acc, value| {
                let value = value?;
                Ok(match func {
                    Func::Min => acc.min(value),
                    Func::Max => acc.max(value),
                })
            })
        }
    }
}
