//! Recursive-descent parser for the query DSL
//!
//! Produces condition trees whose comparison leaves are all `Generic` or
//! `GenericSet`; turning those into backend-concrete variants is the
//! resolver's job. Negation is lowered here, at parse time, by pushing
//! `!` down De Morgan-style and flipping comparison operators.

use crate::condition::{Condition, Operand, Value};
use crate::model::{Dim, Field, Selector, Tag, TaggedDim};
use super::error::ParseError;
use super::lexer::{Lexer, Token};

/// Parse boolean query text into a raw condition tree
pub fn parse_condition(input: &str) -> Result<Condition, ParseError> {
    let mut parser = Parser::new(input)?;
    let condition = parser.parse_or()?;
    parser.expect_end()?;
    Ok(condition)
}

/// Parse a projection list: `*`, or selectors separated by commas
///
/// An empty input is allowed and means the same as `*`.
pub fn parse_selector_list(input: &str) -> Result<Vec<Selector>, ParseError> {
    let mut parser = Parser::new(input)?;
    if parser.at_end() {
        return Ok(vec![]);
    }
    if parser.eat(&Token::Star) {
        parser.expect_end()?;
        return Ok(vec![Selector::All]);
    }

    let mut selectors = vec![parser.parse_selector()?];
    while parser.eat(&Token::Comma) {
        selectors.push(parser.parse_selector()?);
    }
    parser.expect_end()?;
    Ok(selectors)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    position: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens, position: 0 })
    }

    fn current(&self) -> Option<&(Token, usize)> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let entry = self.tokens.get(self.position).cloned();
        if entry.is_some() {
            self.position += 1;
        }
        entry
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consume the current token when it equals `token`
    fn eat(&mut self, token: &Token) -> bool {
        if self.current().map(|(t, _)| t) == Some(token) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ParseError> {
        match self.current() {
            Some((t, _)) if t == token => {
                self.position += 1;
                Ok(())
            }
            Some((t, pos)) => Err(ParseError::UnexpectedToken {
                found: t.describe(),
                pos: *pos,
                expected,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.current() {
            None => Ok(()),
            Some((token, pos)) => Err(ParseError::TrailingInput {
                fragment: token.describe(),
                pos: *pos,
            }),
        }
    }

    // bool_expr := and_expr ('|' and_expr)*
    fn parse_or(&mut self) -> Result<Condition, ParseError> {
        let mut parts = vec![self.parse_and()?];
        while self.eat(&Token::Pipe) {
            parts.push(self.parse_and()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Condition::Or(parts))
        }
    }

    // and_expr := unary_expr (('&' | ',') unary_expr)*
    fn parse_and(&mut self) -> Result<Condition, ParseError> {
        let mut parts = vec![self.parse_unary()?];
        while self.eat(&Token::Amp) || self.eat(&Token::Comma) {
            parts.push(self.parse_unary()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Condition::And(parts))
        }
    }

    // unary_expr := '!' unary_expr | '(' bool_expr ')' | comparison
    fn parse_unary(&mut self) -> Result<Condition, ParseError> {
        match self.current() {
            Some((Token::Bang, pos)) => {
                let pos = *pos;
                self.position += 1;
                let inner = self.parse_unary()?;
                negate(inner, pos)
            }
            Some((Token::LParen, _)) => {
                self.position += 1;
                let inner = self.parse_or()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    // comparison := (selector | '@' ident) op (value | value_set)
    fn parse_comparison(&mut self) -> Result<Condition, ParseError> {
        let lhs = match self.parse_selector()? {
            Selector::Field(field) => Operand::Field(field),
            Selector::Pattern(pattern) => Operand::Pattern(pattern),
            // parse_selector only returns All for a bare '*', which the
            // selector-list entry point consumes before getting here
            Selector::All => {
                return Err(ParseError::UnexpectedEnd { expected: "selector" });
            }
        };

        let op = match self.advance() {
            Some((Token::Op(op), _)) => op,
            Some((token, pos)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    pos,
                    expected: "comparison operator",
                });
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "comparison operator" }),
        };

        // A '{' opens either a {var} reference or a value set
        if self.looking_at_set() {
            self.position += 1;
            let mut values = vec![self.parse_value()?];
            while self.eat(&Token::Comma) {
                values.push(self.parse_value()?);
            }
            self.expect(&Token::RBrace, "'}'")?;
            Ok(Condition::GenericSet { lhs, op, values })
        } else {
            let rhs = self.parse_value()?;
            Ok(Condition::Generic { lhs, op, rhs })
        }
    }

    /// Is the parser looking at a value set rather than a `{var}`?
    fn looking_at_set(&self) -> bool {
        let mut offset = 0;
        let peek = |o: usize| self.tokens.get(self.position + o).map(|(t, _)| t);
        if peek(offset) != Some(&Token::LBrace) {
            return false;
        }
        offset += 1;
        if let Some(Token::Ident(_)) = peek(offset) {
            // `{ident}` is a variable; anything else after the ident is a set
            peek(offset + 1) != Some(&Token::RBrace)
        } else {
            true
        }
    }

    // value := quoted_string | int | float | dotted_quad | '{'var'}' | regex
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.advance() {
            Some((Token::Str(s), _)) => Ok(Value::Str(s)),
            Some((Token::Int(n), _)) => Ok(Value::Int(n)),
            Some((Token::Float(n), _)) => Ok(Value::Float(n)),
            Some((Token::Regex(pattern), _)) => Ok(Value::Regex(pattern)),
            Some((Token::LBrace, _)) => {
                let name = match self.advance() {
                    Some((Token::Ident(name), _)) => name,
                    Some((token, pos)) => {
                        return Err(ParseError::UnexpectedToken {
                            found: token.describe(),
                            pos,
                            expected: "variable name",
                        });
                    }
                    None => return Err(ParseError::UnexpectedEnd { expected: "variable name" }),
                };
                self.expect(&Token::RBrace, "'}'")?;
                Ok(Value::Var(name))
            }
            Some((token, pos)) => Err(ParseError::UnexpectedToken {
                found: token.describe(),
                pos,
                expected: "value",
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "value" }),
        }
    }

    // selector := '@' ident | ident (':' ident)* ':'?
    //
    // A bare ident is a dimension; `a:b:c` is tags {a, b} with dimension c;
    // a trailing ':' means tags only, no dimension.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        if self.eat(&Token::At) {
            return match self.advance() {
                Some((Token::Ident(name), _)) => Ok(Selector::Field(Field::new(name))),
                Some((token, pos)) => Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    pos,
                    expected: "field name",
                }),
                None => Err(ParseError::UnexpectedEnd { expected: "field name" }),
            };
        }

        let mut idents = match self.advance() {
            Some((Token::Ident(name), _)) => vec![name],
            Some((token, pos)) => {
                return Err(ParseError::UnexpectedToken {
                    found: token.describe(),
                    pos,
                    expected: "selector",
                });
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "selector" }),
        };

        let mut trailing_colon = false;
        while self.eat(&Token::Colon) {
            match self.current() {
                Some((Token::Ident(_), _)) => {
                    if let Some((Token::Ident(name), _)) = self.advance() {
                        idents.push(name);
                    }
                }
                _ => {
                    trailing_colon = true;
                    break;
                }
            }
        }

        let pattern = if trailing_colon {
            TaggedDim::new(idents.into_iter().map(Tag::new), None)
        } else if idents.len() == 1 {
            TaggedDim::of_dim(idents.remove(0))
        } else {
            let dim = idents.pop().map(Dim::new);
            TaggedDim::new(idents.into_iter().map(Tag::new), dim)
        };
        Ok(Selector::Pattern(pattern))
    }
}

/// Lower a negation by rewriting the negated subtree
///
/// De Morgan over And/Or; comparisons flip their operator token. `=~` has
/// no negated form and is rejected.
fn negate(condition: Condition, pos: usize) -> Result<Condition, ParseError> {
    match condition {
        Condition::And(parts) => {
            let parts: Vec<Condition> = parts
                .into_iter()
                .map(|p| negate(p, pos))
                .collect::<Result<_, _>>()?;
            Ok(Condition::Or(parts))
        }
        Condition::Or(parts) => {
            let parts: Vec<Condition> = parts
                .into_iter()
                .map(|p| negate(p, pos))
                .collect::<Result<_, _>>()?;
            Ok(Condition::And(parts))
        }
        Condition::Generic { lhs, op, rhs } => Ok(Condition::Generic {
            lhs,
            op: flip_op(&op, pos)?,
            rhs,
        }),
        Condition::GenericSet { lhs, op, values } => Ok(Condition::GenericSet {
            lhs,
            op: flip_op(&op, pos)?,
            values,
        }),
        // The parser never builds these before negation runs
        Condition::True
        | Condition::Equals { .. }
        | Condition::NotEqual { .. }
        | Condition::GreaterThan { .. }
        | Condition::GreaterThanEqualTo { .. }
        | Condition::LessThan { .. }
        | Condition::LessThanEqualTo { .. }
        | Condition::Matches { .. } => Err(ParseError::CannotNegate { pos }),
    }
}

fn flip_op(op: &str, pos: usize) -> Result<String, ParseError> {
    let flipped = match op {
        "==" => "!=",
        "!=" => "==",
        ">" => "<=",
        "<=" => ">",
        ">=" => "<",
        "<" => ">=",
        _ => return Err(ParseError::NegatedMatch { pos }),
    };
    Ok(flipped.to_string())
}
