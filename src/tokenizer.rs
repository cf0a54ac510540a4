use log::trace;

pub const DEFINE: &str = ":";
pub const END_DEFINE: &str = ";";

/// Splits a line on runs of whitespace. There is no quoting or escaping, so
/// every non-blank run of characters is its own token.
pub fn tokenize(line: &str) -> Vec<&str> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    trace!("tokens: {:?}", tokens);
    tokens
}
