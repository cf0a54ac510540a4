use crate::{
    error::{Error, Result},
    tokenizer::{tokenize, DEFINE, END_DEFINE},
};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub body: String,
}

/// Folds the `:` ... `;` span of a line, if any, into a single compound token.
///
/// A line may hold at most one definition. Duplicate delimiters, an unmatched
/// delimiter, or a `;` before the `:` reject the whole line with
/// [`Error::MalformedDefinition`] and nothing from it should be evaluated.
pub fn parse(tokens: &[&str]) -> Result<Vec<String>> {
    let starts: Vec<usize> = positions(tokens, DEFINE);
    let ends: Vec<usize> = positions(tokens, END_DEFINE);

    let span = match (starts.as_slice(), ends.as_slice()) {
        ([], []) => None,
        ([start], [end]) if start <= end => Some((*start, *end)),
        _ => {
            let clause = tokens.join(" ");
            debug!(
                "rejecting line with {} ':' and {} ';': {}",
                starts.len(),
                ends.len(),
                clause
            );
            return Err(Error::MalformedDefinition { clause });
        }
    };

    let Some((start, end)) = span else {
        return Ok(tokens.iter().map(|token| token.to_string()).collect());
    };

    let mut parsed = Vec::with_capacity(tokens.len() - (end - start));
    parsed.extend(tokens[..start].iter().map(|token| token.to_string()));
    parsed.push(tokens[start..=end].join(" "));
    parsed.extend(tokens[end + 1..].iter().map(|token| token.to_string()));
    Ok(parsed)
}

fn positions(tokens: &[&str], delimiter: &str) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| **token == delimiter)
        .map(|(i, _)| i)
        .collect()
}

/// Splits a compound `: name body... ;` token back into its name and body.
pub fn parse_definition(clause: &str) -> Result<Definition> {
    let parts = tokenize(clause);

    let malformed = || Error::MalformedDefinition {
        clause: clause.to_string(),
    };

    if parts.first() != Some(&DEFINE) {
        return Err(malformed());
    }

    let body_end = match parts.last() {
        Some(&END_DEFINE) => parts.len() - 1,
        _ => parts.len(),
    };

    match parts.get(1) {
        Some(&name) if body_end >= 2 => Ok(Definition {
            name: name.to_string(),
            body: parts[2..body_end].join(" "),
        }),
        _ => Err(malformed()),
    }
}
