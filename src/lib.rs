pub mod builtins;
pub mod cli;
pub mod dictionary;
pub mod error;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod session;
pub mod stack;
pub mod tokenizer;
