use crate::Engine;

use jackdaw_lexer::token::{Token, TokenKind};
use jackdaw_vm::instruction::{Command, Segment};

use std::io::{self, Write};

/// Binary operators, all of equal precedence, left-associative.
const OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

impl<'a, W: Write> Engine<'a, W> {
    /// expression := term (op term)*
    ///
    /// Each operator is emitted right after its right-hand term, which
    /// realises strict left-to-right evaluation on the stack.
    pub(crate) fn compile_expression(&mut self) -> io::Result<()> {
        self.compile_term()?;

        loop {
            let Some(op) = self.current_op() else { break };

            self.tokenizer.advance();
            self.compile_term()?;
            self.writer.write_op(op)?;
        }

        Ok(())
    }

    fn current_op(&self) -> Option<char> {
        let token = self.tokenizer.current()?;

        if token.kind != TokenKind::Symbol {
            return None;
        }

        token.lexeme.chars().next().filter(|ch| OPS.contains(ch))
    }

    fn compile_term(&mut self) -> io::Result<()> {
        let Some(token) = self.tokenizer.current().cloned() else {
            self.expected("varName or constant");
            return Ok(());
        };

        match token.kind {
            TokenKind::IntConst => {
                self.tokenizer.advance();
                self.writer
                    .write_push(Segment::Constant, token.lexeme.parse().unwrap_or(0))?;
            }

            TokenKind::StringConst => {
                self.tokenizer.advance();
                self.compile_string(&token.lexeme)?;
            }

            TokenKind::Keyword => self.compile_keyword_constant(&token)?,

            TokenKind::Symbol => match token.lexeme.chars().next() {
                Some('(') => {
                    self.tokenizer.advance();
                    self.compile_expression()?;
                    self.check_symbol(')');
                }
                Some(op @ ('-' | '~')) => {
                    self.tokenizer.advance();
                    self.compile_term()?;
                    self.writer.write_unary_op(op)?;
                }
                _ => self.expected("parenthesis or unaryOp"),
            },

            TokenKind::Identifier => {
                self.tokenizer.advance();
                self.compile_identifier_term(token)?;
            }
        }

        Ok(())
    }

    fn compile_keyword_constant(&mut self, token: &Token) -> io::Result<()> {
        match token.lexeme.as_str() {
            // true is the all-ones word
            "true" => {
                self.tokenizer.advance();
                self.writer.write_push(Segment::Constant, 1)?;
                self.writer.write_command(Command::Neg)?;
            }
            "false" | "null" => {
                self.tokenizer.advance();
                self.writer.write_push(Segment::Constant, 0)?;
            }
            "this" => {
                self.tokenizer.advance();
                self.writer.write_push(Segment::Pointer, 0)?;
            }
            _ => self.expected("keywordConstant"),
        }

        Ok(())
    }

    /// A string literal builds a String instance one character at a time.
    fn compile_string(&mut self, value: &str) -> io::Result<()> {
        self.writer
            .write_push(Segment::Constant, value.chars().count())?;
        self.writer.write_call("String.new", 1)?;

        for ch in value.chars() {
            self.writer.write_push(Segment::Constant, ch as usize)?;
            self.writer.write_call("String.appendChar", 2)?;
        }

        Ok(())
    }

    /// A term starting with an identifier: array read, call on the
    /// current object, qualified call, or plain value read. `name` has
    /// already been consumed.
    fn compile_identifier_term(&mut self, name: Token) -> io::Result<()> {
        if self.current_is_symbol('[') {
            return self.compile_array_read(&name);
        }

        if self.current_is_symbol('(') {
            return self.compile_self_call(&name);
        }

        if self.current_is_symbol('.') {
            return self.compile_qualified_call(&name);
        }

        match self
            .symbols
            .lookup(&name.lexeme)
            .map(|s| (s.kind.segment(), s.index))
        {
            Some((segment, index)) => self.writer.write_push(segment, index)?,
            None => self.undeclared(&name),
        }

        Ok(())
    }

    fn compile_array_read(&mut self, name: &Token) -> io::Result<()> {
        self.tokenizer.advance(); // [
        self.compile_expression()?; // element index
        self.check_symbol(']');

        match self
            .symbols
            .lookup(&name.lexeme)
            .map(|s| (s.kind.segment(), s.index))
        {
            Some((segment, index)) => self.writer.write_push(segment, index)?,
            None => self.undeclared(name),
        }

        self.writer.write_command(Command::Add)?;
        self.writer.write_pop(Segment::Pointer, 1)?;
        self.writer.write_push(Segment::That, 0)
    }

    /// A bare call names a method of the current object; the receiver is
    /// pushed before the arguments and counts towards the arity.
    fn compile_self_call(&mut self, name: &Token) -> io::Result<()> {
        self.tokenizer.advance(); // (

        self.writer.write_push(Segment::Pointer, 0)?;
        let n_args = self.compile_expression_list()?;
        self.check_symbol(')');

        let function_name = format!("{}.{}", self.class_name, name.lexeme);
        self.writer.write_call(&function_name, n_args + 1)
    }

    /// qualifier '.' subroutineName '(' expressionList ')'
    ///
    /// A qualifier naming a defined variable makes this a method call on
    /// that object; anything else is taken as a class name and emitted
    /// without a diagnostic, which is how OS library calls resolve.
    fn compile_qualified_call(&mut self, qualifier: &Token) -> io::Result<()> {
        self.tokenizer.advance(); // .

        let subroutine = self.check_identifier("subroutineName").lexeme;
        self.check_symbol('(');

        let receiver = self
            .symbols
            .lookup(&qualifier.lexeme)
            .map(|s| (s.kind.segment(), s.index, s.ty.clone()));

        let (function_name, implicit) = match receiver {
            Some((segment, index, ty)) => {
                self.writer.write_push(segment, index)?;
                (format!("{ty}.{subroutine}"), 1)
            }
            None => (format!("{}.{}", qualifier.lexeme, subroutine), 0),
        };

        let n_args = self.compile_expression_list()?;
        self.check_symbol(')');

        self.writer.write_call(&function_name, n_args + implicit)
    }

    /// expressionList := (expression (',' expression)*)?
    ///
    /// Returns the number of expressions compiled; the callers add the
    /// receiver adjustment.
    fn compile_expression_list(&mut self) -> io::Result<usize> {
        if self.current_is_symbol(')') {
            return Ok(0);
        }

        self.compile_expression()?;
        let mut count = 1;

        while self.current_is_symbol(',') {
            self.tokenizer.advance();
            self.compile_expression()?;
            count += 1;
        }

        Ok(count)
    }
}
