//! Local syntax checks

use log::trace;
use rustpython_parser::{parse, Mode};

/// Decides whether a piece of source code parses
pub trait SyntaxValidator
{   fn is_valid(&self, code: &str) -> bool;
}

/// Python 3 grammar check, indentation rules included
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntax;

impl SyntaxValidator for PythonSyntax
{   fn is_valid(&self, code: &str) -> bool
    {   match parse(code, Mode::Module, "<input>")
        {   Ok(_) => true
          , Err(e) => {
              trace!("Rejected {} bytes: {}", code.len(), e);
              false
            }
        }
    }
}
