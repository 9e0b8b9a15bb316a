//! logos-based stylesheet lexer.
//!
//! The stylesheet grammar only cares about rule-block structure, so the lexer emits
//! braces and runs of everything else. Comments are skipped entirely.
//!
//! Token priority in logos is longest match first, which gives us:
//! - `/* ... */` wins over a lone `/`
//! - the voice-family escape `"\"}\""` wins over a lone `"`, so its `}` never closes
//!   a block

use std::ops::Range;

use logos::Logos;

/// Stand-in for the voice-family escape while blocks and declarations are split.
/// Contains none of `{`, `}`, `;`.
pub const VOICE_FAMILY_PLACEHOLDER: &str = "#34#125#34";

/// The literal escape used by the voice-family box-model hack.
pub const VOICE_FAMILY_ESCAPE: &str = r#""\"}\"""#;

/// Stylesheet token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    /// `"\"}\""`: a quoted, escaped closing brace.
    #[token(r#""\"}\"""#)]
    VoiceFamilyEscape,

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// A run of characters with no structural meaning.
    #[regex(r#"[^{}/"]+"#)]
    Text,

    /// A `/` or `"` that did not start a comment or an escape.
    #[regex(r#"[/"]"#)]
    Stray,
}

/// Tokenize a stylesheet into `(Token, span)` pairs, dropping comments. Spans are byte
/// ranges into `input` so errors can point into the original text.
///
/// Unlexable input cannot occur with this token set; should it ever, the offending
/// slice is logged and skipped.
pub fn tokenize(input: &str) -> Vec<(Token, Range<usize>)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| match result {
            Ok(token) => Some((token, span)),
            Err(()) => {
                log::warn!(target: "css", "Skipping unlexable input at byte {}", span.start);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    /// Tokens paired with the source text they cover.
    fn pieces(input: &str) -> Vec<(Token, &str)> {
        tokenize(input)
            .into_iter()
            .map(|(t, span)| (t, &input[span]))
            .collect()
    }

    // ── Structure ────────────────────────────────────────────────────

    #[test]
    fn test_rule_block() {
        assert_eq!(
            pieces("p { color: red; }"),
            vec![
                (Token::Text, "p "),
                (Token::BraceOpen, "{"),
                (Token::Text, " color: red; "),
                (Token::BraceClose, "}"),
            ]
        );
    }

    // ── Comments ─────────────────────────────────────────────────────

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("/* a */p/* b\n * c **/{}"),
            vec![Token::Text, Token::BraceOpen, Token::BraceClose]
        );
    }

    #[test]
    fn test_comment_hides_braces() {
        assert_eq!(tokens("/* } { */"), Vec::<Token>::new());
    }

    #[test]
    fn test_lone_slash_is_stray() {
        assert_eq!(
            pieces("a/b"),
            vec![(Token::Text, "a"), (Token::Stray, "/"), (Token::Text, "b")]
        );
    }

    // ── Voice-family escape ──────────────────────────────────────────

    #[test]
    fn test_voice_family_escape_is_one_token() {
        let result = pieces(r#"voice-family: "\"}\"";"#);
        assert_eq!(result[0], (Token::Text, "voice-family: "));
        assert_eq!(result[1], (Token::VoiceFamilyEscape, VOICE_FAMILY_ESCAPE));
        assert_eq!(result[2], (Token::Text, ";"));
        assert!(!result.iter().any(|(t, _)| *t == Token::BraceClose));
    }

    #[test]
    fn test_plain_quotes_are_stray() {
        assert_eq!(
            tokens(r#"content: ":";"#),
            vec![Token::Text, Token::Stray, Token::Text, Token::Stray, Token::Text]
        );
    }

    #[test]
    fn test_placeholder_has_no_structure() {
        assert!(!VOICE_FAMILY_PLACEHOLDER.contains(['{', '}', ';']));
    }
}
