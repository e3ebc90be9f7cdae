#![allow(clippy::needless_return)]

//! Ember is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping, first-class functions and single-inheritance classes. Ember is a tree-walk
//! interpreter with a hand-written recursive descent parser.
//!
//! Ember is a dynamically typed language. This means that the type of a variable is determined at
//! runtime. This is in contrast to statically typed languages, where the type of a variable is
//! determined at compile time. Dynamically typed languages are often easier to use, but are
//! generally slower than statically typed languages.
//!
//! Ember is a tree-walk interpreter. This means that the interpreter walks the abstract syntax
//! tree (AST) and evaluates each node. This is in contrast to a compiler, which would convert the
//! AST into bytecode or machine code. Tree-walk interpreters are generally easier to implement
//! than compilers, but are generally slower than compilers.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string
//! of characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the
//! characters in the source code.
//!
//! The scanner reports syntax errors in the source code as a [`LexError`](error::LexError).
//! These errors are trivial problems like an unterminated string literal or an unexpected
//! character. Scan errors are accumulated rather than reported as soon as they are encountered:
//! the scanner keeps going so a run can surface every lexical mistake in one pass.
//!
//! ## Parsing
//! The second step in the interpreter is parsing. Parsing is the process of converting a list of
//! tokens into an abstract syntax tree (AST). The parser is implemented in the
//! [`parser`](parser) module as a recursive descent parser. The parser transforms the list of
//! tokens into expressions and statements. [`Expressions`](expr::Expr) are pieces of code that
//! produce a value, specifically an [`Object`](object::Object). Objects are an umbrella term for
//! all types of values in Ember including literals, functions, classes and instances.
//! [`Statements`](stmt::Stmt) are pieces of code that do not produce a value but instead perform
//! some action.
//!
//! The parser reports syntax errors in the source code as a [`ParseError`](error::ParseError).
//! Unlike the scanner, the parser catches errors that span multiple tokens. Much like the
//! scanner, the parser continues parsing the source code after an error using a technique called
//! synchronization, so a single run can report more than one mistake.
//!
//! ## Resolving
//! The third step in the interpreter is resolving. Resolving is the process of statically
//! analyzing the AST to determine the scope of each variable reference before anything runs. The
//! resolver is implemented in the [`resolver`](resolver) module. It reports errors as a
//! [`ResolveError`](error::ResolveError) and, unlike the scanner and parser, stops at the first
//! one: static semantic rules don't benefit from accumulation the way syntax errors do.
//!
//! ## Interpreting
//! The final step is interpreting: evaluating the AST. The interpreter is implemented in the
//! [`interpreter`](interpreter) module. It reports errors as a
//! [`RuntimeError`](error::RuntimeError). While the scanner, parser and resolver try to catch as
//! many mistakes as possible before running the program, some errors — dividing by a string,
//! calling a number — can only be caught while the program is running.
//!
//! The interpreter is also responsible for managing the environment, a chain of scopes mapping
//! variable names to values, implemented in the [`environment`](environment) module.

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::io::Write;

use error::EmberError;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Runs the whole pipeline — scan, parse, resolve, interpret — over a single source string,
/// writing anything the program `print`s to `output`.
///
/// The stages run in order and the first one to fail stops the run; later stages never see a
/// program that didn't make it past an earlier one.
pub struct Ember {
    interpreter: Interpreter,
}

impl Ember {
    pub fn new<W: Write + 'static>(output: W) -> Self {
        Ember {
            interpreter: Interpreter::new(Box::new(output)),
        }
    }

    pub fn run(&mut self, source: &str) -> Result<(), EmberError> {
        let tokens = Scanner::new(source).scan_tokens()?;
        log::debug!("scanned {} token(s)", tokens.len());

        let statements = Parser::new(tokens).parse()?;
        log::debug!("parsed {} statement(s)", statements.len());

        Resolver::new(&mut self.interpreter).resolve(&statements)?;
        log::debug!("resolved all variable references");

        self.interpreter.interpret(&statements)?;
        Ok(())
    }
}
