use crate::instruction::{Command, Segment};

use std::io::{self, Write};

/// Emits VM instructions to the output sink, one per line.
///
/// Write failures are fatal to the surrounding compilation, so every
/// method propagates them.
pub struct VmWriter<W: Write> {
    out: W,
}

impl<W: Write> VmWriter<W> {
    pub fn new(out: W) -> VmWriter<W> {
        VmWriter { out }
    }

    pub fn write_push(&mut self, segment: Segment, index: usize) -> io::Result<()> {
        writeln!(self.out, "push {segment} {index}")
    }

    pub fn write_pop(&mut self, segment: Segment, index: usize) -> io::Result<()> {
        writeln!(self.out, "pop {segment} {index}")
    }

    pub fn write_command(&mut self, command: Command) -> io::Result<()> {
        writeln!(self.out, "{command}")
    }

    /// Emits the instruction for a binary source operator. Multiplication
    /// and division have no machine command and become OS calls.
    pub fn write_op(&mut self, op: char) -> io::Result<()> {
        match op {
            '+' => self.write_command(Command::Add),
            '-' => self.write_command(Command::Sub),
            '&' => self.write_command(Command::And),
            '|' => self.write_command(Command::Or),
            '<' => self.write_command(Command::Lt),
            '>' => self.write_command(Command::Gt),
            '=' => self.write_command(Command::Eq),
            '*' => self.write_call("Math.multiply", 2),
            '/' => self.write_call("Math.divide", 2),
            _ => Ok(()),
        }
    }

    pub fn write_unary_op(&mut self, op: char) -> io::Result<()> {
        match op {
            '-' => self.write_command(Command::Neg),
            '~' => self.write_command(Command::Not),
            _ => Ok(()),
        }
    }

    pub fn write_label(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "label {label}")
    }

    pub fn write_goto(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "goto {label}")
    }

    pub fn write_if_goto(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.out, "if-goto {label}")
    }

    pub fn write_function(&mut self, name: &str, n_locals: usize) -> io::Result<()> {
        writeln!(self.out, "function {name} {n_locals}")
    }

    pub fn write_call(&mut self, name: &str, n_args: usize) -> io::Result<()> {
        writeln!(self.out, "call {name} {n_args}")
    }

    pub fn write_return(&mut self) -> io::Result<()> {
        writeln!(self.out, "return")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut VmWriter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut writer = VmWriter::new(Vec::new());
        f(&mut writer).unwrap();

        String::from_utf8(writer.out).unwrap()
    }

    #[test]
    fn push_and_pop() {
        let text = written(|w| {
            w.write_push(Segment::Constant, 7)?;
            w.write_pop(Segment::That, 0)
        });

        assert_eq!(text, "push constant 7\npop that 0\n");
    }

    #[test]
    fn binary_operators() {
        let text = written(|w| {
            for op in ['+', '-', '&', '|', '<', '>', '='] {
                w.write_op(op)?;
            }
            Ok(())
        });

        assert_eq!(text, "add\nsub\nand\nor\nlt\ngt\neq\n");
    }

    #[test]
    fn multiply_and_divide_call_the_os() {
        let text = written(|w| {
            w.write_op('*')?;
            w.write_op('/')
        });

        assert_eq!(text, "call Math.multiply 2\ncall Math.divide 2\n");
    }

    #[test]
    fn unary_operators() {
        let text = written(|w| {
            w.write_unary_op('-')?;
            w.write_unary_op('~')
        });

        assert_eq!(text, "neg\nnot\n");
    }

    #[test]
    fn flow_and_calls() {
        let text = written(|w| {
            w.write_function("Main.main", 2)?;
            w.write_label("Main_0")?;
            w.write_if_goto("Main_1")?;
            w.write_goto("Main_0")?;
            w.write_label("Main_1")?;
            w.write_call("Output.printInt", 1)?;
            w.write_return()
        });

        assert_eq!(
            text,
            "function Main.main 2\nlabel Main_0\nif-goto Main_1\ngoto Main_0\nlabel Main_1\ncall Output.printInt 1\nreturn\n"
        );
    }
}
