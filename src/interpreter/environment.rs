use std::collections::HashMap;

use crate::value::Value;

/// The fixed set of builtin variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Field separator
    Fs,
    /// Output field separator
    Ofs,
    /// Record separator
    Rs,
    /// Output record separator
    Ors,
    /// Number of fields in the current record
    Nf,
    /// Number of records read so far
    Nr,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Fs,
        Builtin::Ofs,
        Builtin::Rs,
        Builtin::Ors,
        Builtin::Nf,
        Builtin::Nr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Fs => "FS",
            Builtin::Ofs => "OFS",
            Builtin::Rs => "RS",
            Builtin::Ors => "ORS",
            Builtin::Nf => "NF",
            Builtin::Nr => "NR",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn default_value(self) -> Value {
        match self {
            Builtin::Fs | Builtin::Ofs => Value::from(" "),
            Builtin::Rs | Builtin::Ors => Value::from("\n"),
            Builtin::Nf | Builtin::Nr => Value::Integer(0),
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Variable storage. Builtin names resolve to the builtin table; every
/// other name lives in the user table. All variables are global.
#[derive(Debug, Clone)]
pub struct Environment {
    builtins: [Value; 6],
    user: HashMap<String, Value>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            builtins: Builtin::ALL.map(Builtin::default_value),
            user: HashMap::new(),
        }
    }

    /// Read a variable. A user variable that was never assigned reads as 0.
    pub fn get(&self, name: &str) -> Value {
        self.lookup(name).cloned().unwrap_or_default()
    }

    /// The stored value, or `None` for a never-assigned user variable
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        match Builtin::from_name(name) {
            Some(b) => Some(&self.builtins[b.slot()]),
            None => self.user.get(name),
        }
    }

    pub fn set(&mut self, name: &str, value: Value) {
        match Builtin::from_name(name) {
            Some(b) => self.builtins[b.slot()] = value,
            None => {
                self.user.insert(name.to_string(), value);
            }
        }
    }

    #[inline]
    pub fn builtin(&self, builtin: Builtin) -> &Value {
        &self.builtins[builtin.slot()]
    }

    #[inline]
    pub fn set_builtin(&mut self, builtin: Builtin, value: Value) {
        self.builtins[builtin.slot()] = value;
    }
}
