//! Reading and writing whole `<math>` documents.

use crate::error::{ErrorLog, MathError};
use crate::extension::{DefinitionUrlRegistry, ExtendedMath, MathExtension};
use crate::node::{MathNode, MathParser, MathWriter};
use crate::settings::{ReadSettings, WriteSettings};
use crate::xml::XmlInputStream;

/// Everything a read produced: the tree, if one could be built, and every diagnostic logged
/// while building it.
#[derive(PartialEq, Clone, Debug)]
pub struct ReadOutcome {
    pub math: Option<MathNode>,
    pub log: ErrorLog,
}

impl ReadOutcome {
    /// The tree, unless anything worse than a warning was logged. Informational diagnostics,
    /// such as a piecewise with an odd number of children, never discard it.
    ///
    /// Only severity counts. An argument-count diagnostic (10218) in the log does not rescue a
    /// tree that also has an error logged against it, and a log holding nothing but warnings
    /// keeps the tree.
    pub fn into_math(self) -> Option<MathNode> {
        if self.log.has_errors() {
            None
        } else {
            self.math
        }
    }
}

/// Reads a document with the level 3 version 2 extended maths available.
pub fn read_mathml(text: &str, settings: &ReadSettings) -> Result<ReadOutcome, MathError> {
    read_mathml_with(text, settings, &ExtendedMath)
}

/// Reads a document, consulting `extension` for anything outside the core dictionary.
///
/// Only XML which is not well-formed is an `Err`. Every other problem is logged and reading
/// carries on.
#[tracing::instrument(skip_all, fields(extension = extension.name()))]
pub fn read_mathml_with(
    text: &str,
    settings: &ReadSettings,
    extension: &dyn MathExtension,
) -> Result<ReadOutcome, MathError> {
    let mut stream = XmlInputStream::new(text)?;
    let registry = DefinitionUrlRegistry::with_extension(extension);
    let mut log = ErrorLog::new();

    let math = MathParser::new(&mut stream, &mut log, settings, extension, &registry).parse();
    tracing::debug!(diagnostics = log.len(), read = math.is_some(), "read maths");

    Ok(ReadOutcome { math, log })
}

/// Reads a document with default settings, discarding diagnostics. Returns `None` if the text
/// is not well-formed, holds no expression, or produced an error.
pub fn read_mathml_from_string(text: &str) -> Option<MathNode> {
    read_mathml(text, &ReadSettings::default()).ok()?.into_math()
}

pub fn write_mathml(node: Option<&MathNode>, settings: &WriteSettings) -> String {
    write_mathml_with(node, settings, &ExtendedMath)
}

#[tracing::instrument(skip_all, fields(extension = extension.name()))]
pub fn write_mathml_with(
    node: Option<&MathNode>,
    settings: &WriteSettings,
    extension: &dyn MathExtension,
) -> String {
    let mut writer = MathWriter::new(settings, extension);
    writer.write_math(node);
    writer.into_string()
}

/// Writes a document with default settings, starting with an XML declaration.
pub fn write_mathml_to_string(node: &MathNode) -> String {
    write_mathml(Some(node), &WriteSettings::default())
}
