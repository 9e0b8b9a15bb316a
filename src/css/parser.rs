//! Stylesheet text parser.
//!
//! Splits CSS text into rule blocks using the lexer from [`crate::css::tokenizer`],
//! then splits each block body into declarations on `;` and each declaration on its
//! first `:`. Parsing is pure: the result is a list of [`RuleBlock`]s that
//! [`StyleSheet::parse_string`](crate::StyleSheet::parse_string) applies only once the
//! whole input is known to be well formed.

use crate::css::model::Declaration;
use crate::css::tokenizer::{tokenize, Token, VOICE_FAMILY_ESCAPE, VOICE_FAMILY_PLACEHOLDER};

/// Errors from stylesheet parsing. Positions are byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("rule block at byte {position} has no opening brace")]
    MissingOpenBrace { position: usize },
    #[error("unexpected '{{' at byte {position}: nested blocks are not supported")]
    NestedBlock { position: usize },
    #[error("rule block opened at byte {position} is never closed")]
    UnclosedBlock { position: usize },
    #[error("rule block at byte {position} has an empty selector")]
    EmptySelector { position: usize },
    #[error("declaration '{declaration}' in block at byte {position} has no ':'")]
    MissingColon { declaration: String, position: usize },
    #[error("declaration '{declaration}' in block at byte {position} has an empty property name")]
    EmptyProperty { declaration: String, position: usize },
}

/// One `selectors { declarations }` block as found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    /// The raw selector list, trimmed but not yet canonicalized.
    pub selectors: String,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Byte offset of the block's `{`.
    pub position: usize,
}

/// Parse CSS text into rule blocks, in source order.
///
/// Stray `}` characters with nothing pending are skipped. Any other structural
/// problem fails the whole parse.
pub fn parse_stylesheet(input: &str) -> Result<Vec<RuleBlock>, ParseError> {
    let mut blocks = Vec::new();
    let mut buffer = String::new();
    let mut head: Option<(String, usize)> = None;
    let mut buffer_start = 0;

    for (token, span) in tokenize(input) {
        let position = span.start;
        let text = &input[span];

        match token {
            Token::Text | Token::Stray => {
                if buffer.is_empty() {
                    buffer_start = position;
                }
                buffer.push_str(text);
            }
            Token::VoiceFamilyEscape => {
                if buffer.is_empty() {
                    buffer_start = position;
                }
                buffer.push_str(VOICE_FAMILY_PLACEHOLDER);
            }
            Token::BraceOpen => {
                if head.is_some() {
                    return Err(ParseError::NestedBlock { position });
                }
                head = Some((std::mem::take(&mut buffer), position));
            }
            Token::BraceClose => match head.take() {
                Some((selectors, open)) => {
                    let body = std::mem::take(&mut buffer);
                    blocks.push(parse_block(&selectors, &body, open)?);
                }
                None if buffer.trim().is_empty() => {
                    log::warn!(target: "css", "Skipping stray '}}' at byte {position}");
                    buffer.clear();
                }
                None => {
                    return Err(ParseError::MissingOpenBrace {
                        position: buffer_start,
                    });
                }
            },
        }
    }

    if let Some((_, open)) = head {
        return Err(ParseError::UnclosedBlock { position: open });
    }
    if !buffer.trim().is_empty() {
        return Err(ParseError::MissingOpenBrace {
            position: buffer_start,
        });
    }

    log::debug!(target: "css", "Parsed {} rule blocks", blocks.len());
    Ok(blocks)
}

fn parse_block(selectors: &str, body: &str, position: usize) -> Result<RuleBlock, ParseError> {
    let selectors = selectors.trim();
    if selectors.is_empty() {
        return Err(ParseError::EmptySelector { position });
    }

    let declarations = body
        .split(';')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| parse_declaration(piece, position))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        target: "css",
        "Block '{selectors}' at byte {position}: {} declarations",
        declarations.len()
    );

    Ok(RuleBlock {
        selectors: selectors.to_string(),
        declarations,
        position,
    })
}

/// Split one `property: value` piece on its first colon.
fn parse_declaration(piece: &str, position: usize) -> Result<Declaration, ParseError> {
    let Some((property, value)) = piece.split_once(':') else {
        return Err(ParseError::MissingColon {
            declaration: restore_escape(piece),
            position,
        });
    };

    let property = property.trim();
    if property.is_empty() {
        return Err(ParseError::EmptyProperty {
            declaration: restore_escape(piece),
            position,
        });
    }

    let value = value.trim();
    let value = if property == "voice-family" {
        restore_escape(value)
    } else {
        value.to_string()
    };

    Ok(Declaration::new(property, value))
}

fn restore_escape(text: &str) -> String {
    text.replace(VOICE_FAMILY_PLACEHOLDER, VOICE_FAMILY_ESCAPE)
}
