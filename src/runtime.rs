use crate::{
    builtins::Builtin,
    dictionary::Dictionary,
    error::{Error, Result},
    parser::parse_definition,
    stack::Stack,
    tokenizer::DEFINE,
};
use log::trace;
use num_bigint::BigInt;
use std::io::Write;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What a single word means right now, given the current dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Builtin(Builtin),
    DictEntry(String),
    Definition,
    Literal(BigInt),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Bye,
}

#[derive(Debug, Clone)]
pub struct Interpreter {
    stack: Stack,
    dictionary: Dictionary,
    max_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// `max_depth` bounds how many dictionary expansions may nest while
    /// resolving one word.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: Stack::new(),
            dictionary: Dictionary::new(),
            max_depth,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn resolve(&self, word: &str) -> Resolution {
        if let Some(builtin) = Builtin::lookup(word) {
            Resolution::Builtin(builtin)
        } else if let Some(body) = self.dictionary.lookup(word) {
            Resolution::DictEntry(body.to_string())
        } else if word.starts_with(DEFINE) {
            Resolution::Definition
        } else if let Some(value) = parse_integer(word) {
            Resolution::Literal(value)
        } else {
            Resolution::Unknown
        }
    }

    /// Evaluates parsed tokens in order, stopping at the first failure or at
    /// `bye`. Anything already written to `out` stays written.
    pub fn eval_line<W: Write>(&mut self, tokens: &[String], out: &mut W) -> Result<Flow> {
        for token in tokens {
            if self.eval_word(token, out)? == Flow::Bye {
                return Ok(Flow::Bye);
            }
        }
        Ok(Flow::Continue)
    }

    /// Resolves one word, following dictionary entries until they reach
    /// something executable. Expansion is iterative, so `max_depth` is the
    /// only bound on how far a chain of aliases may go.
    pub fn eval_word<W: Write>(&mut self, word: &str, out: &mut W) -> Result<Flow> {
        let mut word = word.to_string();
        let mut depth = 0;

        loop {
            let resolution = self.resolve(&word);
            trace!("{:?} at depth {} -> {:?}", word, depth, resolution);

            match resolution {
                Resolution::Builtin(Builtin::Bye) => return Ok(Flow::Bye),
                Resolution::Builtin(Builtin::Print) => {
                    let value = self.stack.pop()?;
                    write!(out, "{}", value)?;
                }
                Resolution::Builtin(Builtin::PrintStack) => {
                    write!(out, "<{}> ", self.stack.len())?;
                    for value in self.stack.peek_all() {
                        write!(out, "{} ", value)?;
                    }
                }
                Resolution::Builtin(Builtin::Add) => self.stack.add()?,
                // The body is resolved as one word, never split and replayed.
                Resolution::DictEntry(body) => {
                    if depth >= self.max_depth {
                        return Err(Error::DefinitionCycle { word });
                    }
                    word = body;
                    depth += 1;
                    continue;
                }
                Resolution::Definition => {
                    let definition = parse_definition(&word)?;
                    self.dictionary.define(definition.name, definition.body);
                }
                Resolution::Literal(value) => self.stack.push(value),
                Resolution::Unknown => return Err(Error::UnknownToken { token: word }),
            }

            return Ok(Flow::Continue);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an integer literal: optional sign, optional `0x`/`0b`/`0o`/`0d`
/// prefix (a bare leading `0` means octal), and `_` between digits.
pub fn parse_integer(text: &str) -> Option<BigInt> {
    let (negative, unsigned) = match *text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = split_radix(unsigned);

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return (10, text);
    }

    match bytes[1].to_ascii_lowercase() {
        b'x' => (16, &text[2..]),
        b'b' => (2, &text[2..]),
        b'o' => (8, &text[2..]),
        b'd' => (10, &text[2..]),
        _ => (8, &text[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse, tokenizer::tokenize};

    fn run(interpreter: &mut Interpreter, line: &str) -> (Result<Flow>, String) {
        let mut out = Vec::new();
        let result =
            parse(&tokenize(line)).and_then(|tokens| interpreter.eval_line(&tokens, &mut out));
        (result, String::from_utf8_lossy(&out).into_owned())
    }

    fn stack_values(interpreter: &Interpreter) -> Vec<BigInt> {
        interpreter.stack().peek_all().to_vec()
    }

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().copied().map(BigInt::from).collect()
    }

    #[test]
    fn test_add_then_print() -> Result<()> {
        for (a, b) in [(1, 2), (-7, 3), (0, 0), (i64::MAX, 1)] {
            let mut interpreter = Interpreter::new();
            let (result, _) = run(&mut interpreter, &format!("{} {} +", a, b));
            assert_eq!(result?, Flow::Continue);
            let (result, out) = run(&mut interpreter, ".");
            assert_eq!(result?, Flow::Continue);
            assert_eq!(out, (BigInt::from(a) + BigInt::from(b)).to_string());
        }
        Ok(())
    }

    #[test]
    fn test_print_empty_stack() {
        let mut interpreter = Interpreter::new();
        let (result, out) = run(&mut interpreter, ".");
        assert!(matches!(result, Err(Error::StackUnderflow)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_add_underflow_keeps_stack() {
        let mut interpreter = Interpreter::new();
        let (result, _) = run(&mut interpreter, "5 +");
        assert!(matches!(result, Err(Error::StackUnderflow)));
        assert_eq!(stack_values(&interpreter), ints(&[5]));
    }

    #[test]
    fn test_print_stack() -> Result<()> {
        let mut interpreter = Interpreter::new();
        let (result, out) = run(&mut interpreter, "1 2 3 .s");
        result?;
        assert_eq!(out, "<3> 1 2 3 ");
        assert_eq!(interpreter.stack().len(), 3);

        let (result, out) = run(&mut Interpreter::new(), ".s");
        result?;
        assert_eq!(out, "<0> ");
        Ok(())
    }

    #[test]
    fn test_failure_stops_line() {
        let mut interpreter = Interpreter::new();
        let (result, out) = run(&mut interpreter, "1 foo 2 .s");
        assert!(matches!(result, Err(Error::UnknownToken { token }) if token == "foo"));
        assert!(out.is_empty());
        assert_eq!(stack_values(&interpreter), ints(&[1]));
    }

    #[test]
    fn test_bye_stops_line() -> Result<()> {
        let mut interpreter = Interpreter::new();
        let (result, _) = run(&mut interpreter, "1 bye 2 3");
        assert_eq!(result?, Flow::Bye);
        assert_eq!(stack_values(&interpreter), ints(&[1]));
        Ok(())
    }

    #[test]
    fn test_seeded_word() -> Result<()> {
        let mut interpreter = Interpreter::new();
        let (result, out) = run(&mut interpreter, "4 5 test .");
        result?;
        assert_eq!(out, "9");
        Ok(())
    }

    #[test]
    fn test_alias_matches_builtin() -> Result<()> {
        let mut aliased = Interpreter::new();
        run(&mut aliased, ": answer + ;").0?;
        run(&mut aliased, "1 2 answer").0?;

        let mut direct = Interpreter::new();
        run(&mut direct, "1 2 +").0?;

        assert_eq!(stack_values(&aliased), stack_values(&direct));
        Ok(())
    }

    #[test]
    fn test_redefinition_overwrites() -> Result<()> {
        let mut interpreter = Interpreter::new();
        run(&mut interpreter, ": n 1 ;").0?;
        run(&mut interpreter, ": n 2 ;").0?;
        run(&mut interpreter, "n").0?;
        assert_eq!(stack_values(&interpreter), ints(&[2]));
        assert_eq!(interpreter.dictionary().lookup("n"), Some("2"));
        Ok(())
    }

    #[test]
    fn test_definition_mid_line() -> Result<()> {
        let mut interpreter = Interpreter::new();
        let (result, out) = run(&mut interpreter, "20 22 : sum + ; sum .");
        result?;
        assert_eq!(out, "42");
        Ok(())
    }

    #[test]
    fn test_builtins_cannot_be_shadowed() -> Result<()> {
        let mut interpreter = Interpreter::new();
        run(&mut interpreter, ": + 100 ;").0?;
        assert_eq!(interpreter.dictionary().lookup("+"), Some("100"));
        run(&mut interpreter, "1 2 +").0?;
        assert_eq!(stack_values(&interpreter), ints(&[3]));
        Ok(())
    }

    #[test]
    fn test_multi_token_body_is_one_word() -> Result<()> {
        let mut interpreter = Interpreter::new();
        run(&mut interpreter, ": three 1 2 + ;").0?;
        let (result, out) = run(&mut interpreter, "three");
        assert!(matches!(result, Err(Error::UnknownToken { token }) if token == "1 2 +"));
        assert!(out.is_empty());
        assert!(interpreter.stack().is_empty());
        Ok(())
    }

    #[test]
    fn test_body_may_name_another_word() -> Result<()> {
        let mut interpreter = Interpreter::new();
        run(&mut interpreter, ": plus test ;").0?;
        run(&mut interpreter, ": add plus ;").0?;
        let (result, out) = run(&mut interpreter, "40 2 add .");
        result?;
        assert_eq!(out, "42");
        Ok(())
    }

    #[test]
    fn test_cycle_is_reported() -> Result<()> {
        let mut interpreter = Interpreter::with_max_depth(8);
        run(&mut interpreter, ": ping pong ;").0?;
        run(&mut interpreter, ": pong ping ;").0?;
        let (result, _) = run(&mut interpreter, "ping");
        assert!(matches!(result, Err(Error::DefinitionCycle { .. })));

        run(&mut interpreter, ": self self ;").0?;
        let (result, _) = run(&mut interpreter, "self");
        assert!(matches!(result, Err(Error::DefinitionCycle { word }) if word == "self"));
        Ok(())
    }

    #[test]
    fn test_deep_cycle_does_not_grow_native_stack() -> Result<()> {
        let mut interpreter = Interpreter::with_max_depth(1_000_000);
        run(&mut interpreter, "5 : a a ;").0?;
        let (result, _) = run(&mut interpreter, "a");
        assert!(matches!(result, Err(Error::DefinitionCycle { word }) if word == "a"));

        // state survives the failed line
        let (result, out) = run(&mut interpreter, ".");
        result?;
        assert_eq!(out, "5");
        Ok(())
    }

    #[test]
    fn test_long_alias_chain_within_depth() -> Result<()> {
        let mut interpreter = Interpreter::with_max_depth(10_000);
        run(&mut interpreter, ": w0 + ;").0?;
        for i in 1..5_000 {
            run(&mut interpreter, &format!(": w{} w{} ;", i, i - 1)).0?;
        }
        let (result, out) = run(&mut interpreter, "40 2 w4999 .");
        result?;
        assert_eq!(out, "42");
        Ok(())
    }

    #[test]
    fn test_malformed_clause_at_eval() {
        let mut interpreter = Interpreter::new();
        let (result, _) = run(&mut interpreter, ": ;");
        assert!(matches!(result, Err(Error::MalformedDefinition { .. })));

        let (result, _) = run(&mut interpreter, ":foo");
        assert!(matches!(result, Err(Error::MalformedDefinition { .. })));
        assert_eq!(interpreter.dictionary().len(), 1);
    }

    #[test]
    fn test_resolve() {
        let mut interpreter = Interpreter::new();
        interpreter.dictionary.define("answer", "42");
        assert_eq!(interpreter.resolve("+"), Resolution::Builtin(Builtin::Add));
        assert_eq!(
            interpreter.resolve("answer"),
            Resolution::DictEntry("42".to_string())
        );
        assert_eq!(interpreter.resolve(": x ;"), Resolution::Definition);
        assert_eq!(
            interpreter.resolve("-12"),
            Resolution::Literal(BigInt::from(-12))
        );
        assert_eq!(interpreter.resolve("foo"), Resolution::Unknown);
    }

    #[test]
    fn test_parse_integer() {
        let cases: [(&str, i64); 9] = [
            ("42", 42),
            ("-42", -42),
            ("+7", 7),
            ("0", 0),
            ("0x1f", 31),
            ("0B101", 5),
            ("0o17", 15),
            ("017", 15),
            ("1_000", 1000),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_integer(text), Some(BigInt::from(expected)), "{}", text);
        }

        for text in ["", "-", "0x", "08", "1__0", "_1", "1_", "--1", "1.5", "foo", "0x-1"] {
            assert_eq!(parse_integer(text), None, "{}", text);
        }
    }

    #[test]
    fn test_parse_big_integer() {
        let text = "123456789012345678901234567890";
        assert_eq!(parse_integer(text).map(|v| v.to_string()), Some(text.to_string()));
    }
}
