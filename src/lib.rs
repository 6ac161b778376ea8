pub mod error;
pub mod settings;
pub mod number;
pub mod node;
pub mod xml;
pub mod extension;
pub mod mathml;

#[cfg(test)]
mod tests;

pub use crate::{
    error::{Diagnostic, DiagnosticCode, ErrorLog, MathError, Severity},
    extension::{CoreOnly, DefinitionUrlRegistry, ExtendedMath, MathExtension},
    mathml::{
        read_mathml, read_mathml_from_string, read_mathml_with, write_mathml, write_mathml_to_string,
        write_mathml_with, ReadOutcome,
    },
    node::{Constant, Function, Logical, MathNode, NameKind, NodeKind, Operator, Relational},
    number::Number,
    settings::{FormatContext, ReadSettings, WriteSettings},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
