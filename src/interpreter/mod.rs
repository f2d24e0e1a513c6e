mod environment;
mod expr;
mod stmt;

pub use environment::{Builtin, Environment};

use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::{Arith, Value, arithmetic};

use stmt::StmtResult;

/// Paragraph-mode record separator: one or more blank lines
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n(?:[ \t\r]*\n)*").expect("valid paragraph pattern"));

/// The interpreter: a parsed program plus the runtime state it mutates.
///
/// State is created once and never reset, so calling [`Interpreter::run`]
/// again keeps accumulating NR and variables.
pub struct Interpreter {
    program: Program,
    runtime: Runtime,
}

/// Variable tables and the current record
pub(crate) struct Runtime {
    pub(crate) env: Environment,
    pub(crate) record: Record,
}

/// The record being processed and its fields
#[derive(Debug, Default)]
pub(crate) struct Record {
    pub(crate) line: String,
    pub(crate) fields: Vec<String>,
}

impl Interpreter {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            runtime: Runtime {
                env: Environment::new(),
                record: Record::default(),
            },
        }
    }

    /// Lex and parse a script, failing with a lexical or syntax error
    pub fn from_script(source: &str) -> Result<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        let program = Parser::new(tokens).parse()?;
        Ok(Self::new(program))
    }

    /// Set the field separator
    pub fn set_fs(&mut self, fs: &str) {
        self.runtime.env.set_builtin(Builtin::Fs, Value::from(fs));
    }

    /// Set a variable before execution. The text is coerced the way a field is.
    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.runtime.env.set(name, Value::from_field(value));
    }

    /// Current value of a variable (builtin or user)
    pub fn variable(&self, name: &str) -> Value {
        self.runtime.env.get(name)
    }

    /// Records consumed so far, across every run
    pub fn nr(&self) -> Value {
        self.runtime.env.builtin(Builtin::Nr).clone()
    }

    /// Run the program over `input`, writing everything printed to `output`.
    ///
    /// BEGIN blocks run first, then the input is split on RS once and each
    /// non-blank record goes through the MAIN blocks, then END blocks run.
    /// Any error aborts the run; END blocks are not run after a failure.
    pub fn run<W: Write>(&mut self, input: &str, output: &mut W) -> Result<()> {
        let mut begin = Vec::new();
        let mut main = Vec::new();
        let mut end = Vec::new();
        for block in &self.program.blocks {
            match block.kind {
                BlockKind::Begin => begin.push(block),
                BlockKind::Main => main.push(block),
                BlockKind::End => end.push(block),
            }
        }
        debug!(
            begin = begin.len(),
            main = main.len(),
            end = end.len(),
            "partitioned program blocks"
        );

        let runtime = &mut self.runtime;

        for block in &begin {
            runtime.execute_action(block, output)?;
        }

        let records = runtime.split_records(input);
        debug!(chunks = records.len(), "split input into records");

        for chunk in records {
            if chunk.trim().is_empty() {
                continue;
            }
            runtime.begin_record(chunk)?;

            for block in &main {
                if let Some(pattern) = &block.pattern
                    && !runtime.eval_expr(pattern)?.is_truthy()
                {
                    continue;
                }
                runtime.execute_action(block, output)?;
            }
        }

        for block in &end {
            runtime.execute_action(block, output)?;
        }

        debug!(nr = %runtime.env.builtin(Builtin::Nr), "run finished");
        Ok(())
    }
}

impl Runtime {
    /// Run a top-level block's statements. A break that reaches this level
    /// had no enclosing loop.
    fn execute_action<W: Write>(&mut self, block: &Block, output: &mut W) -> Result<()> {
        match self.execute_statements(&block.statements, output)? {
            StmtResult::Normal => Ok(()),
            StmtResult::Break(location) => Err(Error::UnhandledBreak { location }),
        }
    }

    /// Split the whole input on the current RS
    fn split_records<'i>(&self, input: &'i str) -> Vec<&'i str> {
        let rs = self.env.builtin(Builtin::Rs).to_string_val();
        if rs.is_empty() {
            // Newlines at either end of the input belong to no record
            BLANK_LINES.split(input.trim_matches('\n')).collect()
        } else {
            input.split(rs.as_str()).collect()
        }
    }

    /// Make `line` the current record: bump NR, split fields, set NF
    fn begin_record(&mut self, line: &str) -> Result<()> {
        let nr = arithmetic(Arith::Add, self.env.builtin(Builtin::Nr), &Value::Integer(1))?;
        self.env.set_builtin(Builtin::Nr, nr);

        let fs = self.env.builtin(Builtin::Fs).to_string_val();
        self.record.line = line.to_string();
        self.record.fields = split_fields(line, &fs);

        let nf = i64::try_from(self.record.fields.len()).unwrap_or(i64::MAX);
        self.env.set_builtin(Builtin::Nf, Value::Integer(nf));

        trace!(nr = %self.env.builtin(Builtin::Nr), nf, "processing record");
        Ok(())
    }
}

/// Split a record into fields.
///
/// A single space splits on runs of whitespace and ignores leading and
/// trailing whitespace. An empty separator splits into characters. Anything
/// else splits on the exact string.
fn split_fields(line: &str, fs: &str) -> Vec<String> {
    if fs == " " {
        line.split_whitespace().map(String::from).collect()
    } else if fs.is_empty() {
        line.chars().map(String::from).collect()
    } else {
        line.split(fs).map(String::from).collect()
    }
}
