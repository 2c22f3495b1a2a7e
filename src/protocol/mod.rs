//! Wire grammar for the presence channel.
//!
//! The grammar is deliberately loose: a directive is recognized by a
//! substring match anywhere in the inbound text, not by token position.
//! `"xl0 bob"` is a valid registration for identity `bob`.

/// Substring that marks a registration message.
pub const REGISTER_PATTERN: &str = "l0";

/// Substring that marks a broadcast trigger.
pub const BROADCAST_PATTERN: &str = "m0";

/// Literal payload delivered to every registered session on broadcast.
pub const BROADCAST_PAYLOAD: &str = "m0";

/// A parsed inbound directive.
///
/// Registration takes precedence when a message matches both patterns;
/// the relay broadcasts for every inbound message regardless of variant,
/// so the distinction only affects whether a registry upsert happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Registration message. `identity` is `None` when the message
    /// matched the pattern but carried no second whitespace-delimited
    /// field (malformed registration, handled as a no-op upstream).
    Register { identity: Option<String> },
    Broadcast,
    Unknown,
}

impl Directive {
    /// Parse one inbound text frame.
    pub fn parse(text: &str) -> Self {
        if text.contains(REGISTER_PATTERN) {
            let identity = text
                .split_whitespace()
                .nth(1)
                .map(|field| field.to_string());
            Self::Register { identity }
        } else if text.contains(BROADCAST_PATTERN) {
            Self::Broadcast
        } else {
            Self::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_extracts_second_field() {
        assert_eq!(
            Directive::parse("l0 alice@example.com"),
            Directive::Register {
                identity: Some("alice@example.com".to_string())
            }
        );
    }

    #[test]
    fn register_matches_as_substring() {
        assert_eq!(
            Directive::parse("xl0 bob"),
            Directive::Register {
                identity: Some("bob".to_string())
            }
        );
    }

    #[test]
    fn register_without_identity_is_malformed() {
        assert_eq!(
            Directive::parse("l0"),
            Directive::Register { identity: None }
        );
    }

    #[test]
    fn register_wins_when_both_patterns_match() {
        assert_eq!(
            Directive::parse("l0 m0-user"),
            Directive::Register {
                identity: Some("m0-user".to_string())
            }
        );
    }

    #[test]
    fn broadcast_matches_as_substring() {
        assert_eq!(Directive::parse("m0 broadcast"), Directive::Broadcast);
        assert_eq!(Directive::parse("xxm0yy"), Directive::Broadcast);
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(Directive::parse("hello"), Directive::Unknown);
        assert_eq!(Directive::parse(""), Directive::Unknown);
    }

    #[test]
    fn identity_splits_on_any_whitespace() {
        assert_eq!(
            Directive::parse("l0\tcarol extra"),
            Directive::Register {
                identity: Some("carol".to_string())
            }
        );
    }
}
