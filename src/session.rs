use crate::{
    error::Result,
    parser::parse,
    runtime::{Flow, Interpreter},
    tokenizer::tokenize,
};
use log::debug;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    EndOfInput,
    Bye,
}

impl SessionEnd {
    /// `bye` exits the process with status 0 right away. End of input
    /// returns from `main` normally.
    pub fn exit_code(self) -> Option<i32> {
        match self {
            SessionEnd::Bye => Some(0),
            SessionEnd::EndOfInput => None,
        }
    }
}

/// Reads lines from `input` until end of input or `bye`, reporting each one
/// on `out`.
///
/// With `echo` set, every report is preceded by a cursor-up and
/// cursor-right sequence so it lands just after the text the user typed.
pub fn run<R: BufRead, W: Write>(
    interpreter: &mut Interpreter,
    mut input: R,
    out: &mut W,
    echo: bool,
) -> Result<SessionEnd> {
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if input.read_until(b'\n', &mut buffer)? == 0 {
            debug!("end of input");
            out.flush()?;
            return Ok(SessionEnd::EndOfInput);
        }

        let line = String::from_utf8_lossy(&buffer);
        if echo {
            write_echo(out, &line)?;
        }

        let flow = interpret_line(interpreter, &line, out)?;
        out.flush()?;
        if flow == Flow::Bye {
            return Ok(SessionEnd::Bye);
        }
    }
}

fn write_echo<W: Write>(out: &mut W, line: &str) -> Result<()> {
    write!(out, "\x1b[1A\x1b[{}C", line.chars().count())?;
    Ok(())
}

/// Parses and evaluates one line, then writes ` ok` or the failure message
/// followed by a newline. Lines with a malformed definition are dropped
/// without a message. After `bye` nothing more is written.
pub fn interpret_line<W: Write>(
    interpreter: &mut Interpreter,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let tokens = match parse(&tokenize(line)) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!("line discarded: {}", err);
            writeln!(out)?;
            return Ok(Flow::Continue);
        }
    };

    match interpreter.eval_line(&tokens, out) {
        Ok(Flow::Bye) => return Ok(Flow::Bye),
        Ok(Flow::Continue) => write!(out, " ok")?,
        Err(err) if err.is_recoverable() => {
            debug!("line failed: {}", err);
            write!(out, "{}", err)?;
        }
        Err(err) => return Err(err),
    }

    writeln!(out)?;
    Ok(Flow::Continue)
}
