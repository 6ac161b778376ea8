//! Configuration shared by the reader and writer.

/// The level and version of the host document format. Several reading rules (which attributes
/// are allowed where, which csymbols exist, whether extension elements are available) and the
/// unit namespace emitted by the writer depend on it.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct FormatContext {
    pub level: u32,
    pub version: u32,
}

impl FormatContext {
    pub const DEFAULT_LEVEL: u32 = 3;
    pub const DEFAULT_VERSION: u32 = 2;

    pub fn new(level: u32, version: u32) -> FormatContext {
        FormatContext { level, version }
    }

    /// The namespace URI that unit attributes live in for this level and version.
    pub fn namespace_uri(&self) -> String {
        match self.level {
            1 => "http://www.sbml.org/sbml/level1".to_string(),
            2 => format!("http://www.sbml.org/sbml/level2/version{}", self.version),
            level => format!("http://www.sbml.org/sbml/level{}/version{}/core", level, self.version),
        }
    }

    /// Whether `definitionURL` is allowed on `<ci>` as well as `<csymbol>` and `<semantics>`.
    pub fn allows_ci_definition_url(&self) -> bool {
        self.level > 2 || (self.level == 2 && self.version == 5)
    }
}

impl Default for FormatContext {
    fn default() -> Self {
        FormatContext::new(Self::DEFAULT_LEVEL, Self::DEFAULT_VERSION)
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct ReadSettings {
    /// The format the maths is embedded in. With `None`, every element and csymbol known to the
    /// reader is accepted.
    pub format: Option<FormatContext>,

    /// If set, every element must carry this namespace prefix.
    pub required_prefix: Option<String>,
}

impl ReadSettings {
    pub fn with_format(level: u32, version: u32) -> ReadSettings {
        ReadSettings { format: Some(FormatContext::new(level, version)), ..Default::default() }
    }

    /// The level used by rules which need one even without a format.
    pub fn level(&self) -> u32 {
        self.format.map(|f| f.level).unwrap_or(FormatContext::DEFAULT_LEVEL)
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct WriteSettings {
    pub format: Option<FormatContext>,

    /// Begin the output with `<?xml version="1.0" encoding="UTF-8"?>`.
    pub xml_declaration: bool,
}

impl WriteSettings {
    pub fn with_format(level: u32, version: u32) -> WriteSettings {
        WriteSettings { format: Some(FormatContext::new(level, version)), ..Default::default() }
    }

    /// Units are written only when no format is given, or the format is level 3.
    pub fn writes_units(&self) -> bool {
        self.format.map(|f| f.level == 3).unwrap_or(true)
    }
}

impl Default for WriteSettings {
    fn default() -> Self {
        WriteSettings { format: None, xml_declaration: true }
    }
}
