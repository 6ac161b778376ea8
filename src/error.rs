use std::fmt;

use quick_xml::events::attributes::AttrError;

/// An error which prevents a document from being read at all. Problems with the maths itself are
/// never reported this way; they become `Diagnostic`s in an `ErrorLog` instead.
#[derive(thiserror::Error, Debug)]
pub enum MathError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
pub enum Severity {
    /// Reported, but never causes a read to be rejected.
    Info,

    /// An attribute or prefix was used somewhere it is not allowed. Its value is still applied
    /// where possible.
    Warning,

    /// The offending element was replaced or dropped, but reading carried on.
    Error,

    /// The document could not be interpreted as maths.
    Fatal,
}

/// Every problem the reader knows how to report.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum DiagnosticCode {
    NotMathRoot,
    InvalidMathElement,
    DisallowedMathMLSymbol,
    DisallowedMathMLEncodingUse,
    DisallowedDefinitionURLUse,
    BadCsymbolDefinitionURLValue,
    DisallowedMathTypeAttributeUse,
    DisallowedMathTypeAttributeValue,
    OpsNeedCorrectNumberOfArgs,
    DisallowedMathUnitsUse,
    InvalidUnitIdSyntax,
    InvalidMathMLAttribute,
    InvalidNamespacePrefix,
    BadMathML,
    FailedMathMLReadOfDouble,
    FailedMathMLReadOfInteger,
    FailedMathMLReadOfExponential,
    FailedMathMLReadOfRational,
    BadMathMLNodeType,
}

impl DiagnosticCode {
    /// The stable numeric identifier of this code.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotMathRoot                      => 10200,
            Self::InvalidMathElement               => 10201,
            Self::DisallowedMathMLSymbol           => 10202,
            Self::DisallowedMathMLEncodingUse      => 10203,
            Self::DisallowedDefinitionURLUse       => 10204,
            Self::BadCsymbolDefinitionURLValue     => 10205,
            Self::DisallowedMathTypeAttributeUse   => 10206,
            Self::DisallowedMathTypeAttributeValue => 10207,
            Self::OpsNeedCorrectNumberOfArgs       => 10218,
            Self::DisallowedMathUnitsUse           => 10220,
            Self::InvalidUnitIdSyntax              => 10221,
            Self::InvalidMathMLAttribute           => 10222,
            Self::InvalidNamespacePrefix           => 10223,
            Self::BadMathML                        => 99219,
            Self::FailedMathMLReadOfDouble         => 99220,
            Self::FailedMathMLReadOfInteger        => 99221,
            Self::FailedMathMLReadOfExponential    => 99222,
            Self::FailedMathMLReadOfRational       => 99223,
            Self::BadMathMLNodeType                => 99224,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::NotMathRoot => Severity::Fatal,

            Self::OpsNeedCorrectNumberOfArgs => Severity::Info,

            Self::DisallowedMathMLEncodingUse
            | Self::DisallowedDefinitionURLUse
            | Self::DisallowedMathTypeAttributeUse
            | Self::DisallowedMathUnitsUse
            | Self::InvalidMathMLAttribute
            | Self::InvalidNamespacePrefix => Severity::Warning,

            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// A single problem found while reading, located at the token which caused it.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.code)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// An append-only list of diagnostics collected during a read.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct ErrorLog {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, code: DiagnosticCode, line: usize, column: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(code = code.code(), line, column, %message, "maths diagnostic");
        self.diagnostics.push(Diagnostic { code, line, column, message });
    }

    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Whether anything at `Error` severity or above has been logged.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity() >= Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
