use std::fmt::{self, Display, Formatter};

/// Words the evaluator handles itself. They are resolved before the
/// dictionary, so a colon definition can never shadow one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Bye,
    Print,
    PrintStack,
    Add,
}

pub const BUILTINS: [Builtin; 4] = [
    Builtin::Bye,
    Builtin::Print,
    Builtin::PrintStack,
    Builtin::Add,
];

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bye => "bye",
            Builtin::Print => ".",
            Builtin::PrintStack => ".s",
            Builtin::Add => "+",
        }
    }

    pub fn lookup(word: &str) -> Option<Builtin> {
        BUILTINS.into_iter().find(|builtin| builtin.name() == word)
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
