//! Recursive-descent parser for the policy DSL.
//!
//! Grammar (see spec for the informal EBNF this implements):
//!
//! ```text
//! policy       := [version ";"] rules
//! version      := integer matching POLICY_VERSION (currently 1)
//! rules        := rule { ";" rule } [";"]
//! rule         := disjunction [ "=" verdict ]
//! verdict      := "allow" | "deny"        (default: Deny if omitted)
//! disjunction  := conjunction { "|" conjunction }
//! conjunction  := atom { "&" atom }
//! atom         := ["!"] predicate
//! predicate    := "*"
//!               | "user"  "(" user_spec ")"
//!               | "group" "(" name_or_int ")"
//!               | action_name "(" [ pattern ] ")"
//! user_spec    := name_or_int [ ":" name_or_int ]
//! pattern      := "*" | glob_literal
//! ```
//!
//! `(` … `)` grouping of sub-disjunctions inside a conjunction is
//! deliberately not supported — the grammar above, taken directly from
//! the specification, has no such production. A rule's condition is
//! exactly one disjunction of conjunctions of atoms; no deeper nesting.
//!
//! On any error the parser discards all partial state and returns a
//! single `PolicyError` — no partially built policy is ever observable
//! (see `policy::Policy::new_full`, which is the only place that
//! collapses this further to `Option`).

use busguard_contracts::{error::PolicyError, ActionRegistry, AccessVerdict};

use crate::atom::{Atom, GidSpec, NegatedAtom};
use crate::lexer::{Lexer, Token};
use crate::rule::{Conjunction, Disjunction, Rule};

/// The only policy DSL version this engine understands.
pub const POLICY_VERSION: u32 = 1;

enum NameOrInt {
    Numeric(u32),
    Symbolic(String),
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a ActionRegistry,
}

fn syntax_error(pos: usize, reason: impl Into<String>) -> PolicyError {
    PolicyError::SyntaxError { pos, reason: reason.into() }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) -> Result<(), PolicyError> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(syntax_error(self.pos, format!("expected {:?}", tok)))
        }
    }

    fn parse_name_or_int(&mut self) -> Result<NameOrInt, PolicyError> {
        match self.peek().clone() {
            Token::Name(n) => {
                self.bump();
                match n.parse::<u32>() {
                    Ok(v) => Ok(NameOrInt::Numeric(v)),
                    Err(_) => Ok(NameOrInt::Symbolic(n)),
                }
            }
            other => Err(syntax_error(self.pos, format!("expected a name or integer, found {:?}", other))),
        }
    }

    fn parse_user(&mut self) -> Result<Atom, PolicyError> {
        self.expect(Token::LParen)?;
        let uid_spec = self.parse_name_or_int()?;
        let gid_spec = if self.eat(&Token::Colon) {
            Some(self.parse_name_or_int()?)
        } else {
            None
        };
        self.expect(Token::RParen)?;

        let gid = gid_spec.map(|spec| match spec {
            NameOrInt::Numeric(n) => GidSpec::Numeric(n),
            NameOrInt::Symbolic(s) => GidSpec::Symbolic(s),
        });

        Ok(match uid_spec {
            NameOrInt::Numeric(uid) => Atom::UserId { uid, gid },
            NameOrInt::Symbolic(name) => Atom::UserName { name, gid },
        })
    }

    fn parse_group(&mut self) -> Result<Atom, PolicyError> {
        self.expect(Token::LParen)?;
        let spec = self.parse_name_or_int()?;
        self.expect(Token::RParen)?;
        Ok(match spec {
            NameOrInt::Numeric(gid) => Atom::GroupId { gid },
            NameOrInt::Symbolic(name) => Atom::GroupName { name },
        })
    }

    /// Consume tokens up to (not including) the closing `)`, concatenating
    /// `Name`, `Star`, and `QuotedString` tokens into a single pattern
    /// string. An empty parenthesized body yields `None`.
    fn parse_pattern(&mut self) -> Result<Option<String>, PolicyError> {
        if *self.peek() == Token::RParen {
            return Ok(None);
        }
        let mut pattern = String::new();
        loop {
            match self.peek().clone() {
                Token::Name(n) => {
                    pattern.push_str(&n);
                    self.bump();
                }
                Token::Star => {
                    pattern.push('*');
                    self.bump();
                }
                Token::Question => {
                    pattern.push('?');
                    self.bump();
                }
                Token::QuotedString(q) => {
                    pattern.push_str(&q);
                    self.bump();
                }
                Token::RParen => break,
                other => {
                    return Err(syntax_error(self.pos, format!("unexpected token in pattern: {:?}", other)))
                }
            }
        }
        Ok(Some(pattern))
    }

    fn parse_action(&mut self, name: &str) -> Result<Atom, PolicyError> {
        let action = self
            .registry
            .lookup(name)
            .ok_or_else(|| PolicyError::UnknownAction { name: name.to_string() })?;
        self.expect(Token::LParen)?;
        let pattern = self.parse_pattern()?;
        self.expect(Token::RParen)?;

        let arity_ok = match (action.takes_argument, &pattern) {
            (false, None) => true,
            (true, Some(_)) => true,
            _ => false,
        };
        if !arity_ok {
            return Err(PolicyError::ArityMismatch { name: name.to_string() });
        }

        Ok(Atom::Action { action_id: action.id, pattern })
    }

    fn parse_predicate(&mut self) -> Result<Atom, PolicyError> {
        match self.peek().clone() {
            Token::Star => {
                self.bump();
                Ok(Atom::Wildcard)
            }
            Token::Name(n) if n == "user" => {
                self.bump();
                self.parse_user()
            }
            Token::Name(n) if n == "group" => {
                self.bump();
                self.parse_group()
            }
            Token::Name(n) => {
                self.bump();
                self.parse_action(&n)
            }
            other => Err(syntax_error(self.pos, format!("expected a predicate, found {:?}", other))),
        }
    }

    fn parse_atom(&mut self) -> Result<NegatedAtom, PolicyError> {
        let negated = self.eat(&Token::Bang);
        let atom = self.parse_predicate()?;
        Ok(NegatedAtom::new(atom, negated))
    }

    fn parse_conjunction(&mut self) -> Result<Conjunction, PolicyError> {
        let mut atoms = vec![self.parse_atom()?];
        while self.eat(&Token::Amp) {
            atoms.push(self.parse_atom()?);
        }

        if atoms.len() > 1 && atoms.iter().any(|a| a.atom == Atom::Wildcard) {
            return Err(PolicyError::WildcardMixing);
        }

        let mut seen_action_ids = Vec::new();
        for a in &atoms {
            if let Atom::Action { action_id, .. } = a.atom {
                if seen_action_ids.contains(&action_id) {
                    return Err(syntax_error(
                        self.pos,
                        "the same action cannot appear twice in one conjunction",
                    ));
                }
                seen_action_ids.push(action_id);
            }
        }

        Ok(Conjunction::new(atoms))
    }

    fn parse_disjunction(&mut self) -> Result<Disjunction, PolicyError> {
        let mut conjunctions = vec![self.parse_conjunction()?];
        while self.eat(&Token::Pipe) {
            conjunctions.push(self.parse_conjunction()?);
        }
        Ok(Disjunction::new(conjunctions))
    }

    fn parse_verdict(&mut self) -> Result<AccessVerdict, PolicyError> {
        match self.peek().clone() {
            Token::Name(n) if n == "allow" => {
                self.bump();
                Ok(AccessVerdict::Allow)
            }
            Token::Name(n) if n == "deny" => {
                self.bump();
                Ok(AccessVerdict::Deny)
            }
            other => Err(syntax_error(self.pos, format!("expected 'allow' or 'deny', found {:?}", other))),
        }
    }

    fn parse_rule(&mut self) -> Result<Rule, PolicyError> {
        let condition = self.parse_disjunction()?;
        let verdict = if self.eat(&Token::Eq) {
            self.parse_verdict()?
        } else {
            AccessVerdict::Deny
        };
        Ok(Rule::new(condition, verdict))
    }
}

/// Parse policy `text` against `registry`, returning the ordered rule
/// list or the first error encountered.
pub fn parse(text: &str, registry: &ActionRegistry) -> Result<Vec<Rule>, PolicyError> {
    if text.trim().is_empty() {
        return Err(PolicyError::EmptyOrWhitespace);
    }

    let tokens = Lexer::tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0, registry };

    // Optional "<version>;" prefix. Only recognised when the very first
    // token is a bare integer immediately followed by ';' or end of
    // input — an action name that happens to parse as an integer but is
    // followed by '(' is never mistaken for a version.
    if let Token::Name(n) = parser.peek().clone() {
        if let Ok(version) = n.parse::<u32>() {
            let next = &parser.tokens[parser.pos + 1];
            if matches!(next, Token::Semi | Token::End) {
                if version != POLICY_VERSION {
                    return Err(PolicyError::BadVersion { found: n, expected: POLICY_VERSION });
                }
                parser.bump();
                parser.eat(&Token::Semi);
            }
        }
    }

    let mut rules = Vec::new();
    loop {
        if *parser.peek() == Token::End {
            break;
        }
        rules.push(parser.parse_rule()?);
        match parser.peek() {
            Token::Semi => {
                parser.bump();
            }
            Token::End => break,
            other => {
                return Err(syntax_error(parser.pos, format!("expected ';' or end of input, found {:?}", other)))
            }
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use busguard_contracts::ActionDescriptor;

    fn empty_registry() -> ActionRegistry {
        ActionRegistry::new(vec![])
    }

    #[test]
    fn bare_version_with_no_rules_is_valid() {
        assert_eq!(parse("1", &empty_registry()).unwrap().len(), 0);
    }

    #[test]
    fn version_with_trailing_semicolon_and_nothing_else_is_valid() {
        assert_eq!(parse("1;", &empty_registry()).unwrap().len(), 0);
    }

    #[test]
    fn double_semicolon_after_version_is_rejected() {
        assert!(parse("1;;", &empty_registry()).is_err());
    }

    #[test]
    fn wrong_version_is_rejected_even_if_body_would_parse() {
        let err = parse("2;user(user:group)", &empty_registry()).unwrap_err();
        assert!(matches!(err, PolicyError::BadVersion { .. }));
    }

    #[test]
    fn bare_number_without_rule_body_is_rejected() {
        assert!(parse("0", &empty_registry()).is_err());
        assert!(parse("0.0", &empty_registry()).is_err());
        assert!(parse(" 0 ", &empty_registry()).is_err());
        assert!(parse("x", &empty_registry()).is_err());
        assert!(parse("0123456789;", &empty_registry()).is_err());
    }

    #[test]
    fn empty_and_whitespace_only_are_rejected() {
        assert!(matches!(parse("", &empty_registry()), Err(PolicyError::EmptyOrWhitespace)));
        assert!(matches!(parse(" ", &empty_registry()), Err(PolicyError::EmptyOrWhitespace)));
    }

    #[test]
    fn wildcard_mixed_with_other_atom_is_rejected() {
        let reg = ActionRegistry::new(vec![ActionDescriptor::new("foo", 1, true)]);
        assert!(matches!(parse("1;*&foo(a)=allow", &reg), Err(PolicyError::WildcardMixing)));
    }

    #[test]
    fn duplicate_action_within_one_conjunction_is_rejected() {
        let reg = ActionRegistry::new(vec![ActionDescriptor::new("foo", 1, true)]);
        assert!(parse("1;foo(a)&foo(b)=deny", &reg).is_err());
    }

    #[test]
    fn same_action_in_different_disjuncts_is_allowed() {
        let reg = ActionRegistry::new(vec![ActionDescriptor::new("foo", 1, true)]);
        assert!(parse("1;foo(a)|foo(b)=allow", &reg).is_ok());
    }

    #[test]
    fn empty_parens_require_no_arg_action() {
        let takes_arg = ActionRegistry::new(vec![ActionDescriptor::new("foo", 1, true)]);
        assert!(parse("1;foo()", &takes_arg).is_err());

        let no_arg = ActionRegistry::new(vec![ActionDescriptor::new("bar", 1, false)]);
        assert!(parse("1;bar(*)", &no_arg).is_err());
    }

    #[test]
    fn user_and_group_keywords_are_never_shadowed_by_a_registered_action() {
        // "user" is parsed as the built-in user() predicate regardless of
        // what is registered under that name, so this succeeds even
        // though ActionRegistry::lookup("user") itself returns None.
        let reg = ActionRegistry::new(vec![ActionDescriptor::new("user", 1, true)]);
        assert!(parse("1;user(0)=allow", &reg).is_ok());
    }

    #[test]
    fn unknown_action_name_is_rejected() {
        let reg = empty_registry();
        assert!(matches!(parse("1;foo(x)", &reg), Err(PolicyError::UnknownAction { .. })));
    }

    #[test]
    fn pattern_may_contain_question_marks() {
        let reg = ActionRegistry::new(vec![ActionDescriptor::new("foo", 1, true)]);
        let rules = parse("1;foo(a?c)=allow", &reg).unwrap();
        assert_eq!(rules.len(), 1);
    }
}
