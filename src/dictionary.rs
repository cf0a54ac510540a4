use log::debug;
use std::collections::HashMap;

/// Word name to replacement body, populated by colon definitions.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: HashMap<String, String>,
}

impl Dictionary {
    /// A dictionary holding only the seeded `test` word (an alias for `+`).
    pub fn new() -> Self {
        let mut dictionary = Self::empty();
        dictionary.define("test", "+");
        dictionary
    }

    pub fn empty() -> Self {
        Self {
            words: HashMap::new(),
        }
    }

    /// Inserts or overwrites `name`. The last definition wins.
    pub fn define(&mut self, name: impl Into<String>, body: impl Into<String>) {
        let (name, body) = (name.into(), body.into());
        debug!("define {:?} -> {:?}", name, body);
        self.words.insert(name, body);
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.words.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
