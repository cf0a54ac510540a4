use clap::Parser;
use dictforth::{
    cli::{Args, Commands},
    error::Result,
    repl::{REPLPrompt, SyntaxHighlighter},
    runtime::{Flow, Interpreter},
    session::{self, interpret_line, SessionEnd},
};
use dirs::home_dir;
use log::{debug, info};
use nu_ansi_term::{Color, Style};
use reedline::{DefaultHinter, FileBackedHistory, Reedline, Signal};
use std::{
    io::{self, Write},
    process,
};

fn run_stdin(mut interpreter: Interpreter, echo: bool) -> Result<SessionEnd> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    session::run(&mut interpreter, stdin.lock(), &mut stdout, echo)
}

fn run_repl(mut interpreter: Interpreter, history_size: usize) -> Result<SessionEnd> {
    let mut line_editor = Reedline::create()
        .with_hinter(Box::new(
            DefaultHinter::default().with_style(Style::new().italic().fg(Color::LightGray)),
        ))
        .with_highlighter(Box::new(SyntaxHighlighter));

    // Add file-backed history if possible
    if let Some(history) = home_dir()
        .map(|home| home.join(".dictforth_history"))
        .and_then(|path| FileBackedHistory::with_file(history_size, path).ok())
        .map(Box::new)
    {
        line_editor = line_editor.with_history(history);
    } else {
        eprintln!("NOTE: Failed to load history. Persistence is now disabled.")
    }

    let mut stdout = io::stdout();

    loop {
        let prompt = REPLPrompt::new(interpreter.stack().len());
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                let flow = interpret_line(&mut interpreter, &buffer, &mut stdout)?;
                stdout.flush()?;
                if flow == Flow::Bye {
                    break Ok(SessionEnd::Bye);
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                break Ok(SessionEnd::EndOfInput);
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    debug!("max depth: {}", args.max_depth);

    let interpreter = Interpreter::with_max_depth(args.max_depth);

    let end = match args.command.unwrap_or(Commands::Stdin { no_echo: false }) {
        Commands::Stdin { no_echo } => {
            info!("STDIN MODE");
            debug!("echo: {}", !no_echo);

            run_stdin(interpreter, !no_echo)
        }
        Commands::Repl { history_size } => {
            info!("REPL MODE");
            debug!("history size: {}", history_size);

            run_repl(interpreter, history_size)
        }
    };

    match end {
        Ok(end) => {
            if let Some(code) = end.exit_code() {
                process::exit(code);
            }
        }
        Err(err) => eprintln!("{}", err),
    }
    Ok(())
}
