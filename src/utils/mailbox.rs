// file: src/utils/mailbox.rs
// version: 1.1.0
// guid: de70f319-e295-492f-8bab-39326ff2973c

//! RFC 5322 mailbox parsing.
//!
//! Accepts a single `mailbox` production: either a bare `addr-spec`
//! (`ops@example.com`) or a `name-addr` (`Ops Team <ops@example.com>`).
//! Comments and folding whitespace (CFWS) may appear between tokens and are
//! dropped. Only the syntax is checked; no DNS or SMTP lookups are ever made.

use thiserror::Error;

/// A parsed mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Decoded display name, if one was given
    pub name: Option<String>,
    /// The addr-spec with comments and folding whitespace removed
    pub address: String,
}

/// Reasons a mailbox failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailboxError {
    #[error("no address")]
    NoAddress,

    #[error("missing '@' or angle-addr")]
    MissingAtOrAngleAddr,

    #[error("no angle-addr")]
    NoAngleAddr,

    #[error("unclosed angle-addr")]
    UnclosedAngleAddr,

    #[error("missing '@' in addr-spec")]
    MissingAt,

    #[error("invalid local-part in addr-spec")]
    InvalidLocalPart,

    #[error("no domain in addr-spec")]
    NoDomain,

    #[error("invalid domain in addr-spec")]
    InvalidDomain,

    #[error("unclosed quoted-string")]
    UnclosedQuotedString,

    #[error("invalid character in quoted-string")]
    InvalidQuotedString,

    #[error("unclosed domain-literal")]
    UnclosedDomainLiteral,

    #[error("unclosed comment")]
    UnclosedComment,

    #[error("missing word in phrase")]
    MissingWordInPhrase,

    #[error("expected single address")]
    ExpectedSingleAddress,
}

/// Parse a single RFC 5322 mailbox
pub fn parse_mailbox(input: &str) -> Result<Mailbox, MailboxError> {
    let mut parser = Parser::new(input);
    parser.skip_cfws()?;
    if parser.is_empty() {
        return Err(MailboxError::NoAddress);
    }

    // addr-spec is the stricter grammar, so it is tried first
    let start = parser.pos;
    let spec_err = match parser.consume_addr_spec() {
        Ok(address) => {
            parser.skip_cfws()?;
            if !parser.is_empty() {
                return Err(MailboxError::ExpectedSingleAddress);
            }
            return Ok(Mailbox { name: None, address });
        }
        Err(MailboxError::UnclosedComment) => return Err(MailboxError::UnclosedComment),
        Err(e) => e,
    };
    parser.pos = start;

    let name = if parser.peek() != Some('<') {
        match parser.consume_phrase() {
            Ok(name) => Some(name),
            Err(MailboxError::UnclosedComment) => return Err(MailboxError::UnclosedComment),
            Err(_) => return Err(spec_err),
        }
    } else {
        None
    };

    parser.skip_cfws()?;
    if parser.is_empty() {
        let bare_atom = name
            .as_deref()
            .map(|n| n.chars().all(|c| is_atext(c) || c == '.'))
            .unwrap_or(false);
        return Err(if bare_atom {
            MailboxError::MissingAtOrAngleAddr
        } else {
            MailboxError::NoAngleAddr
        });
    }
    if !parser.consume('<') {
        return Err(spec_err);
    }

    parser.skip_cfws()?;
    let address = parser.consume_addr_spec()?;
    parser.skip_cfws()?;
    if !parser.consume('>') {
        return Err(MailboxError::UnclosedAngleAddr);
    }

    parser.skip_cfws()?;
    if !parser.is_empty() {
        return Err(MailboxError::ExpectedSingleAddress);
    }

    Ok(Mailbox { name, address })
}

/// RFC 5322 atext, widened to non-ASCII for internationalized addresses
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || "!#$%&'*+-/=?^_`{|}~".contains(c)
        || (!c.is_ascii() && !c.is_control() && !c.is_whitespace())
}

fn is_dtext(c: char) -> bool {
    matches!(c, '!'..='Z' | '^'..='~')
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// CFWS = *([FWS] comment) [FWS], where comments nest
    fn skip_cfws(&mut self) -> Result<(), MailboxError> {
        loop {
            self.consume_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
            if !self.consume('(') {
                return Ok(());
            }

            let mut depth = 1usize;
            while depth > 0 {
                match self.bump() {
                    None => return Err(MailboxError::UnclosedComment),
                    Some('\\') => {
                        if self.bump().is_none() {
                            return Err(MailboxError::UnclosedComment);
                        }
                    }
                    Some('(') => depth += 1,
                    Some(')') => depth -= 1,
                    Some(_) => {}
                }
            }
        }
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// dot-atom = 1*atext *("." 1*atext)
    fn consume_dot_atom(&mut self) -> Option<&'a str> {
        let start = self.pos;
        loop {
            if self.consume_while(is_atext).is_empty() {
                self.pos = start;
                return None;
            }
            if !self.consume('.') {
                break;
            }
        }
        Some(&self.input[start..self.pos])
    }

    /// Returns the raw quoted text (quotes included) and its decoded content
    fn consume_quoted_string(&mut self) -> Result<(&'a str, String), MailboxError> {
        let start = self.pos;
        if !self.consume('"') {
            return Err(MailboxError::InvalidQuotedString);
        }

        let mut decoded = String::new();
        loop {
            match self.bump() {
                None => return Err(MailboxError::UnclosedQuotedString),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(c) => decoded.push(c),
                    None => return Err(MailboxError::UnclosedQuotedString),
                },
                Some(c) if c == '\t' || !c.is_control() => decoded.push(c),
                Some(_) => return Err(MailboxError::InvalidQuotedString),
            }
        }

        Ok((&self.input[start..self.pos], decoded))
    }

    /// addr-spec = local-part "@" domain, rebuilt without CFWS
    fn consume_addr_spec(&mut self) -> Result<String, MailboxError> {
        let local = if self.peek() == Some('"') {
            self.consume_quoted_string()?.0
        } else {
            self.consume_dot_atom().ok_or(MailboxError::InvalidLocalPart)?
        };

        self.skip_cfws()?;
        if !self.consume('@') {
            return Err(MailboxError::MissingAt);
        }
        self.skip_cfws()?;

        let domain = match self.peek() {
            None | Some('>') => return Err(MailboxError::NoDomain),
            Some('[') => self.consume_domain_literal()?,
            Some(_) => self.consume_dot_atom().ok_or(MailboxError::InvalidDomain)?,
        };

        Ok(format!("{}@{}", local, domain))
    }

    /// domain-literal = "[" *dtext "]"
    fn consume_domain_literal(&mut self) -> Result<&'a str, MailboxError> {
        let start = self.pos;
        self.consume('[');
        loop {
            match self.bump() {
                None => return Err(MailboxError::UnclosedDomainLiteral),
                Some(']') => return Ok(&self.input[start..self.pos]),
                Some(c) if is_dtext(c) => {}
                Some(_) => return Err(MailboxError::InvalidDomain),
            }
        }
    }

    /// phrase = 1*word, where obsolete phrases may also contain "."
    fn consume_phrase(&mut self) -> Result<String, MailboxError> {
        let mut words = Vec::new();
        loop {
            self.skip_cfws()?;
            match self.peek() {
                Some('"') => {
                    let (_, decoded) = self.consume_quoted_string()?;
                    words.push(decoded);
                }
                Some(c) if is_atext(c) || c == '.' => {
                    let atom = self.consume_while(|c| is_atext(c) || c == '.');
                    words.push(atom.to_string());
                }
                _ => break,
            }
        }

        if words.is_empty() {
            return Err(MailboxError::MissingWordInPhrase);
        }
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_addr_spec() {
        let mailbox = parse_mailbox("ops@example.com").unwrap();
        assert_eq!(mailbox.address, "ops@example.com");
        assert_eq!(mailbox.name, None);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let mailbox = parse_mailbox("  ops@example.com \t").unwrap();
        assert_eq!(mailbox.address, "ops@example.com");
    }

    #[test]
    fn test_name_addr() {
        let mailbox = parse_mailbox("Ops Team <ops@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Ops Team"));
        assert_eq!(mailbox.address, "ops@example.com");

        let mailbox = parse_mailbox("\"Ops, \\\"Night\\\" Team\" <ops@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Ops, \"Night\" Team"));

        let mailbox = parse_mailbox("<ops@example.com>").unwrap();
        assert_eq!(mailbox.name, None);
        assert_eq!(mailbox.address, "ops@example.com");
    }

    #[test]
    fn test_quoted_local_part_and_domain_literal() {
        assert_eq!(
            parse_mailbox("\"john doe\"@example.com").unwrap().address,
            "\"john doe\"@example.com"
        );
        assert_eq!(parse_mailbox("ops@[10.0.0.1]").unwrap().address, "ops@[10.0.0.1]");
        assert_eq!(
            parse_mailbox("first.last+tag@mail.example.co.uk").unwrap().address,
            "first.last+tag@mail.example.co.uk"
        );
    }

    #[test]
    fn test_single_word_without_at() {
        let err = parse_mailbox("not-an-email").unwrap_err();
        assert_eq!(err, MailboxError::MissingAtOrAngleAddr);
        assert_eq!(err.to_string(), "missing '@' or angle-addr");
    }

    #[test]
    fn test_phrase_without_angle_addr() {
        assert_eq!(parse_mailbox("John Doe").unwrap_err(), MailboxError::NoAngleAddr);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_mailbox("").unwrap_err(), MailboxError::NoAddress);
        assert_eq!(parse_mailbox("   ").unwrap_err(), MailboxError::NoAddress);
    }

    #[test]
    fn test_malformed_addresses() {
        assert_eq!(parse_mailbox("ops@").unwrap_err(), MailboxError::NoDomain);
        assert_eq!(parse_mailbox("ops@example..com").unwrap_err(), MailboxError::InvalidDomain);
        assert_eq!(parse_mailbox("@example.com").unwrap_err(), MailboxError::InvalidLocalPart);
        assert_eq!(
            parse_mailbox("Ops <ops@example.com").unwrap_err(),
            MailboxError::UnclosedAngleAddr
        );
        assert_eq!(parse_mailbox("Ops <ops>").unwrap_err(), MailboxError::MissingAt);
        assert_eq!(parse_mailbox("ops@[10.0.0.1").unwrap_err(), MailboxError::UnclosedDomainLiteral);
        assert_eq!(parse_mailbox("\"ops@example.com").unwrap_err(), MailboxError::UnclosedQuotedString);
    }

    #[test]
    fn test_multiple_addresses_rejected() {
        assert_eq!(
            parse_mailbox("a@example.com, b@example.com").unwrap_err(),
            MailboxError::ExpectedSingleAddress
        );
        assert_eq!(
            parse_mailbox("Ops <ops@example.com> trailing").unwrap_err(),
            MailboxError::ExpectedSingleAddress
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        let mailbox = parse_mailbox("ops@example.com (Ops)").unwrap();
        assert_eq!(mailbox.address, "ops@example.com");
        assert_eq!(mailbox.name, None);

        assert_eq!(parse_mailbox("(Ops) ops@example.com").unwrap().address, "ops@example.com");
        assert_eq!(
            parse_mailbox("ops(on call)@(primary)example.com").unwrap().address,
            "ops@example.com"
        );
        assert_eq!(parse_mailbox("ops @ example.com").unwrap().address, "ops@example.com");
    }

    #[test]
    fn test_comments_around_name_addr() {
        let mailbox = parse_mailbox("Ops (night shift) Team < ops@example.com > (pager)").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Ops Team"));
        assert_eq!(mailbox.address, "ops@example.com");
    }

    #[test]
    fn test_nested_and_escaped_comments() {
        assert_eq!(
            parse_mailbox("ops@example.com (a (b) c)").unwrap().address,
            "ops@example.com"
        );
        assert_eq!(
            parse_mailbox("ops@example.com (closing \\) stays inside)").unwrap().address,
            "ops@example.com"
        );
    }

    #[test]
    fn test_unclosed_comment() {
        assert_eq!(parse_mailbox("ops@example.com (Ops").unwrap_err(), MailboxError::UnclosedComment);
        assert_eq!(parse_mailbox("(Ops ops@example.com").unwrap_err(), MailboxError::UnclosedComment);
        assert_eq!(
            parse_mailbox("Ops (team <ops@example.com>").unwrap_err(),
            MailboxError::UnclosedComment
        );
        assert_eq!(
            parse_mailbox("ops@example.com (a (b) c").unwrap_err().to_string(),
            "unclosed comment"
        );
    }

    #[test]
    fn test_comment_after_at_is_not_a_domain() {
        assert_eq!(parse_mailbox("ops@ (none)").unwrap_err(), MailboxError::NoDomain);
        assert_eq!(parse_mailbox("Ops <ops@ >").unwrap_err(), MailboxError::NoDomain);
    }
}
