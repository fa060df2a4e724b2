//! Single-pass compilation engine for the Jack language.
//!
//! The engine is a recursive-descent translator driven by one token of
//! look-ahead. No syntax tree is built: semantic actions run while the
//! grammar is walked, pushing declarations into the symbol table and
//! instructions out through the VM writer. Declarations are handled
//! here; statements live in `stmt`, expressions and terms in `expr`.

mod expr;
mod stmt;
pub mod symbol_table;

use symbol_table::{Kind, SymbolTable};

pub use jackdaw_errors::CompileError;
use jackdaw_errors::{Diagnostics, JackError};
use jackdaw_lexer::token::{Token, TokenKind};
use jackdaw_lexer::Tokenizer;
use jackdaw_vm::instruction::Segment;
use jackdaw_vm::writer::VmWriter;

use log::trace;
use thin_vec::ThinVec;

use std::env;
use std::io::{self, Read, Write};

/// Compiles one class read from `input`, writing VM code to `output`.
///
/// Syntax and undeclared-variable diagnostics accumulate while emission
/// continues as far as possible; they are returned together at the end.
/// I/O failures on either stream abort immediately.
///
/// When the environment variable `JACK_DUMP_TOKENS` is `true`, the token
/// stream is written instead of VM code.
pub fn analyse(input: &mut impl Read, output: &mut impl Write) -> Result<(), CompileError> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;

    if env::var("JACK_DUMP_TOKENS").is_ok_and(|v| v.eq_ignore_ascii_case("true")) {
        return Ok(dump_tokens(&source, output)?);
    }

    Engine::new(Tokenizer::new(&source), VmWriter::new(output)).compile()
}

/// Writes the token stream of `source` as one XML-escaped
/// `<kind>lexeme</kind>` element per token.
pub fn dump_tokens(source: &str, output: &mut impl Write) -> io::Result<()> {
    let mut tokenizer = Tokenizer::new(source);

    write!(output, "<tokens>")?;

    tokenizer.advance();
    while let Some(token) = tokenizer.current() {
        writeln!(
            output,
            "<{0}>{1}</{0}>",
            token.kind,
            xml_escape(&token.lexeme)
        )?;
        tokenizer.advance();
    }

    write!(output, "</tokens>")?;
    Ok(())
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

pub struct Engine<'a, W: Write> {
    tokenizer: Tokenizer<'a>,
    writer: VmWriter<W>,
    symbols: SymbolTable,
    class_name: String,
    label_counter: usize,
    errors: ThinVec<JackError>,
}

impl<'a, W: Write> Engine<'a, W> {
    pub fn new(tokenizer: Tokenizer<'a>, writer: VmWriter<W>) -> Engine<'a, W> {
        Engine {
            tokenizer,
            writer,
            symbols: SymbolTable::new(),
            class_name: String::new(),
            label_counter: 0,
            errors: ThinVec::new(),
        }
    }

    pub fn compile(mut self) -> Result<(), CompileError> {
        self.tokenizer.advance();
        self.compile_class()?;

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CompileError::Diagnostics(Diagnostics(self.errors)))
        }
    }

    /// class := 'class' ClassName '{' classVarDec* subroutineDec* '}'
    fn compile_class(&mut self) -> io::Result<()> {
        self.check_keyword("class");
        self.class_name = self.check_identifier("className").lexeme;
        self.check_symbol('{');

        while let Some(kind) = self.class_var_kind() {
            self.compile_class_var_dec(kind);
        }

        while let Some(kind) = self.subroutine_kind() {
            self.compile_subroutine(kind)?;
        }

        self.check_symbol('}');
        Ok(())
    }

    fn class_var_kind(&self) -> Option<Kind> {
        let token = self.tokenizer.current()?;

        match token.kind {
            TokenKind::Keyword => Kind::from_declaration(&token.lexeme),
            _ => None,
        }
    }

    fn subroutine_kind(&self) -> Option<SubroutineKind> {
        let token = self.tokenizer.current()?;

        if token.kind != TokenKind::Keyword {
            return None;
        }

        match token.lexeme.as_str() {
            "constructor" => Some(SubroutineKind::Constructor),
            "function" => Some(SubroutineKind::Function),
            "method" => Some(SubroutineKind::Method),
            _ => None,
        }
    }

    /// classVarDec := ('static' | 'field') type varName (',' varName)* ';'
    fn compile_class_var_dec(&mut self, kind: Kind) {
        self.tokenizer.advance(); // static | field

        let ty = self.check_type();
        let name = self.check_identifier("varName").lexeme;
        self.symbols.define(&name, &ty, kind);

        while self.current_is_symbol(',') {
            self.tokenizer.advance();
            let name = self.check_identifier("varName").lexeme;
            self.symbols.define(&name, &ty, kind);
        }

        self.check_symbol(';');
    }

    /// subroutineDec := ('constructor' | 'function' | 'method')
    ///                  ('void' | type) subroutineName
    ///                  '(' parameterList ')' subroutineBody
    fn compile_subroutine(&mut self, kind: SubroutineKind) -> io::Result<()> {
        self.tokenizer.advance(); // constructor | function | method

        self.check_return_type();
        let name = self.check_identifier("subroutineName").lexeme;

        self.symbols.begin_scope();

        // a method receives the object as its first argument
        if kind == SubroutineKind::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Argument);
        }

        self.check_symbol('(');
        self.compile_parameter_list();
        self.check_symbol(')');

        self.check_symbol('{');
        while self.current_is_keyword("var") {
            self.compile_var_dec();
        }

        // the header carries the local count, so it can only be emitted
        // once every var declaration has been seen
        let function_name = format!("{}.{}", self.class_name, name);
        self.writer
            .write_function(&function_name, self.symbols.var_count(Kind::Local))?;

        match kind {
            SubroutineKind::Constructor => {
                self.writer
                    .write_push(Segment::Constant, self.symbols.var_count(Kind::This))?;
                self.writer.write_call("Memory.alloc", 1)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Method => {
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.check_symbol('}');

        self.symbols.end_scope();
        Ok(())
    }

    /// parameterList := ((type varName) (',' type varName)*)?
    fn compile_parameter_list(&mut self) {
        if self.current_is_symbol(')') {
            return;
        }

        let ty = self.check_type();
        let name = self.check_identifier("varName").lexeme;
        self.symbols.define(&name, &ty, Kind::Argument);

        while self.current_is_symbol(',') {
            self.tokenizer.advance();
            let ty = self.check_type();
            let name = self.check_identifier("varName").lexeme;
            self.symbols.define(&name, &ty, Kind::Argument);
        }
    }

    /// varDec := 'var' type varName (',' varName)* ';'
    fn compile_var_dec(&mut self) {
        self.tokenizer.advance(); // var

        let ty = self.check_type();
        let name = self.check_identifier("varName").lexeme;
        self.symbols.define(&name, &ty, Kind::Local);

        while self.current_is_symbol(',') {
            self.tokenizer.advance();
            let name = self.check_identifier("varName").lexeme;
            self.symbols.define(&name, &ty, Kind::Local);
        }

        self.check_symbol(';');
    }

    fn next_label(&mut self) -> String {
        let label = format!("{}_{}", self.class_name, self.label_counter);
        self.label_counter += 1;
        label
    }

    fn current_is_symbol(&self, ch: char) -> bool {
        self.tokenizer.current().is_some_and(|t| t.is_symbol(ch))
    }

    fn current_is_keyword(&self, keyword: &str) -> bool {
        self.tokenizer
            .current()
            .is_some_and(|t| t.is_keyword(keyword))
    }

    fn got(&self) -> String {
        match self.tokenizer.current() {
            Some(token) => token.to_string(),
            None => "EOF".to_owned(),
        }
    }

    fn expected(&mut self, expected: &str) {
        let got = self.got();
        self.errors.push(JackError::expected(expected, got));
    }

    fn undeclared(&mut self, token: &Token) {
        self.errors.push(JackError::undeclared(token.to_string()));
    }

    /// Consumes the current token, recording a diagnostic unless it is
    /// the expected symbol. Consuming on a mismatch keeps positional
    /// progress at the cost of cascading diagnostics.
    fn check_symbol(&mut self, ch: char) {
        trace!("expect symbol '{ch}'");

        if !self.current_is_symbol(ch) {
            self.expected(&format!("'{ch}'"));
        }

        self.tokenizer.advance();
    }

    fn check_keyword(&mut self, keyword: &str) {
        trace!("expect keyword '{keyword}'");

        if !self.current_is_keyword(keyword) {
            self.expected(keyword);
        }

        self.tokenizer.advance();
    }

    /// Consumes an identifier and returns it. On a mismatch the offending
    /// token is still consumed and an empty-named placeholder comes back,
    /// so downstream lookups fail instead of parsing stopping here.
    fn check_identifier(&mut self, what: &str) -> Token {
        trace!("expect {what}");

        let current = self.tokenizer.current().cloned();

        match current {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.tokenizer.advance();
                token
            }
            other => {
                self.expected(what);
                self.tokenizer.advance();

                Token::new(
                    TokenKind::Identifier,
                    String::new(),
                    other.map_or(0, |t| t.line),
                )
            }
        }
    }

    /// type := 'int' | 'char' | 'boolean' | className
    fn check_type(&mut self) -> String {
        trace!("expect type");

        let current = self.tokenizer.current().cloned();

        let ty = match current {
            Some(token) if token.kind == TokenKind::Keyword => match token.lexeme.as_str() {
                "int" | "char" | "boolean" => token.lexeme,
                _ => {
                    self.expected("type : int, boolean or char");
                    String::new()
                }
            },
            Some(token) if token.kind == TokenKind::Identifier => token.lexeme,
            _ => {
                self.expected("type or className");
                String::new()
            }
        };

        self.tokenizer.advance();
        ty
    }

    fn check_return_type(&mut self) {
        if self.current_is_keyword("void") {
            trace!("expect void");
            self.tokenizer.advance();
        } else {
            self.check_type();
        }
    }
}
