use derive_more::{Display, Error, From};

use std::error;

use thin_vec::ThinVec;

use std::fmt;
use std::io;

/// A non-fatal diagnostic. Compilation keeps going after recording one;
/// all of them are returned together at the end.
#[derive(Error, Display, Debug, Clone)]
pub enum JackError {
    #[display(fmt = "syntax error : expected {expected}, got {got}")]
    Syntax { expected: String, got: String },

    #[display(fmt = "compiler error : undeclared var {got}")]
    Undeclared { got: String },
}

impl JackError {
    pub fn expected(expected: impl Into<String>, got: impl Into<String>) -> JackError {
        JackError::Syntax {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn undeclared(got: impl Into<String>) -> JackError {
        JackError::Undeclared { got: got.into() }
    }
}

/// Diagnostics accumulated over one compilation, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics(pub ThinVec<JackError>);

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            write!(f, "{error}")?;
        }

        Ok(())
    }
}

/// Outcome of a failed compilation: either the source or sink broke
/// (fatal, compilation stopped there) or the input had errors (VM output
/// was still emitted as far as possible).
#[derive(Display, From, Debug)]
pub enum CompileError {
    #[display(fmt = "{}", _0)]
    Io(io::Error),

    #[display(fmt = "{}", _0)]
    Diagnostics(Diagnostics),
}

impl error::Error for CompileError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            CompileError::Io(err) => Some(err),
            CompileError::Diagnostics(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_messages() {
        let syntax = JackError::expected("';'", "lex=symbol, value=}, lineNo=3");
        assert_eq!(
            syntax.to_string(),
            "syntax error : expected ';', got lex=symbol, value=}, lineNo=3"
        );

        let undeclared = JackError::undeclared("lex=identifier, value=x, lineNo=1");
        assert_eq!(
            undeclared.to_string(),
            "compiler error : undeclared var lex=identifier, value=x, lineNo=1"
        );
    }

    #[test]
    fn diagnostics_join_with_newlines() {
        let mut errors = ThinVec::new();
        errors.push(JackError::expected("a", "b"));
        errors.push(JackError::expected("c", "d"));

        let joined = Diagnostics(errors).to_string();
        assert_eq!(
            joined,
            "syntax error : expected a, got b\nsyntax error : expected c, got d"
        );
    }
}
