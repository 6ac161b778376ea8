use crate::error::{DiagnosticCode, ErrorLog};
use crate::extension::{is_valid_csymbol, DefinitionUrlRegistry, MathExtension};
use crate::number::{self, NumberError};
use crate::settings::{FormatContext, ReadSettings};
use crate::xml::{TokenCursor, XmlToken};

use super::dictionary;
use super::kind::{Function, NameKind, NodeKind};
use super::math::MathNode;

/// Elements which may stand on their own as an expression, rather than only inside one.
const NODE_TAGS: [&str; 12] = [
    "apply", "cn", "ci", "csymbol", "true", "false", "notanumber", "pi", "infinity",
    "exponentiale", "semantics", "piecewise",
];

/// Elements which are not operators, but are likely to be mistaken for one.
const NOT_OPERATORS: [&str; 7] = ["bvar", "piece", "otherwise", "logbase", "degree", "lambda", "semantics"];

/// Builds an expression tree from a stream of tokens.
///
/// Problems are logged to `log` rather than returned, and never stop the read: each element is
/// always consumed up to its end tag, so one malformed node leaves the rest of the stream intact.
pub struct MathParser<'a, C: TokenCursor> {
    pub cursor: &'a mut C,
    pub log: &'a mut ErrorLog,
    pub settings: &'a ReadSettings,
    pub extension: &'a dyn MathExtension,
    pub registry: &'a DefinitionUrlRegistry,
}

impl<'a, C: TokenCursor> MathParser<'a, C> {
    pub fn new(
        cursor: &'a mut C,
        log: &'a mut ErrorLog,
        settings: &'a ReadSettings,
        extension: &'a dyn MathExtension,
        registry: &'a DefinitionUrlRegistry,
    ) -> Self {
        MathParser { cursor, log, settings, extension, registry }
    }

    /// Reads a whole document. Its root is normally `<math>`, holding at most one expression,
    /// but may also be a bare expression element.
    ///
    /// Returns `None` for an empty `<math>`, or if the root is not something maths can be read
    /// from.
    pub fn parse(&mut self) -> Option<MathNode> {
        self.cursor.skip_text();
        let root = match self.cursor.peek() {
            Some(root) => root.clone(),
            None => {
                self.log.log(DiagnosticCode::NotMathRoot, 1, 1, "The document has no root element.");
                return None;
            }
        };

        if root.is_start() && root.name == "math" {
            self.check_prefix(&root);
            self.cursor.next();
            if root.is_self_closing() {
                return None;
            }

            self.cursor.skip_text();
            let first = match self.cursor.peek().cloned() {
                Some(first) if !first.is_end_for(&root) => first,
                _ => {
                    self.cursor.skip_past_end(&root);
                    return None;
                }
            };

            let math = if first.is_start() && (self.is_node_tag(&first.name) || first.name == "lambda") {
                self.read_node()
            } else {
                self.log_at(
                    &first,
                    DiagnosticCode::BadMathMLNodeType,
                    format!("<{}> cannot be used directly following a <math> tag.", first.name),
                );
                MathNode::default()
            };

            // The expression may have been read fine, with something else following it
            self.cursor.skip_text();
            if let Some(next) = self.cursor.peek().cloned() {
                if !next.is_end_for(&root) && !self.log.contains(DiagnosticCode::BadMathML) {
                    let message = format!(
                        "Unexpected element encountered. The element <{}> should not be encountered here.",
                        next.name,
                    );
                    self.log_at(&root, DiagnosticCode::InvalidMathElement, message);
                }
            }
            self.cursor.skip_past_end(&root);

            Some(math)
        } else if root.is_start() && self.is_node_tag(&root.name) {
            Some(self.read_node())
        } else {
            self.log_at(
                &root,
                DiagnosticCode::NotMathRoot,
                format!("<{}> is not a maths element.", root.name),
            );
            None
        }
    }

    /// Reads the element at the cursor into a new node.
    pub fn read_node(&mut self) -> MathNode {
        let mut node = MathNode::default();
        self.read_into(&mut node);
        node
    }

    pub fn is_node_tag(&self, name: &str) -> bool {
        NODE_TAGS.contains(&name) || self.extension.is_node_tag(name)
    }

    fn format(&self) -> FormatContext {
        self.settings.format.unwrap_or_default()
    }

    fn log_at(&mut self, token: &XmlToken, code: DiagnosticCode, message: impl Into<String>) {
        self.log.log(code, token.line, token.column, message);
    }

    fn check_prefix(&mut self, token: &XmlToken) {
        if let Some(required) = &self.settings.required_prefix {
            if token.prefix.as_deref() != Some(required.as_str()) {
                let message = format!("Element <{}> should have prefix \"{}\".", token.name, required);
                self.log.log(DiagnosticCode::InvalidNamespacePrefix, token.line, token.column, message);
            }
        }
    }

    /// Reads the element at the cursor into `node`. Wrappers such as `<bvar>` and `<degree>` do
    /// not get a node of their own; they read their content into the node they were given.
    fn read_into(&mut self, node: &mut MathNode) {
        self.cursor.skip_text();
        let elem = match self.cursor.peek().cloned() {
            Some(token) if token.is_start() => token,
            _ => return,
        };
        self.cursor.next();
        let name = elem.name.as_str();
        tracing::trace!(element = name, line = elem.line, "reading element");

        let entry = dictionary::lookup(name);
        let extension_kind = match entry {
            None if self.settings.level() > 2 => self.extension.node_kind_for(name, self.settings.format),
            _ => None,
        };
        if entry.is_none() && extension_kind.is_none() {
            let format = self.format();
            let message = format!("<{}> is not valid in level {} version {}.", name, format.level, format.version);
            self.log_at(&elem, DiagnosticCode::DisallowedMathMLSymbol, message);
        }

        self.check_prefix(&elem);
        self.read_attributes(node, &elem);

        match name {
            "apply" => self.read_apply(node, &elem),
            "lambda" => {
                node.kind = NodeKind::Lambda;
                self.read_arguments(node, &elem);
            }
            "piecewise" => {
                node.kind = NodeKind::Piecewise;
                self.read_arguments(node, &elem);
            }
            "bvar" => {
                node.bvar = true;
                if !elem.is_self_closing() {
                    self.read_into(node);
                }
            }
            "degree" | "logbase" | "piece" | "otherwise" => {
                if !elem.is_self_closing() {
                    self.read_into(node);
                }

                // The enclosing element's loop reads the condition and consumes `</piece>`
                if name == "piece" {
                    return;
                }
            }
            "semantics" => self.read_semantics(node, &elem),
            "ci" | "csymbol" => self.read_name(node, &elem),
            "cn" => self.read_number(node, &elem),
            _ => match (entry, extension_kind) {
                (Some(entry), _) => node.kind = entry.kind,
                (None, Some(kind)) => {
                    node.kind = kind;
                    if self.extension.is_node_tag(name) {
                        self.read_arguments(node, &elem);
                    }
                }
                (None, None) => (),
            },
        }

        add_default_argument(node);

        // Only the value of an `otherwise` is read, so anything more is surplus
        if name == "otherwise" && !elem.is_self_closing() {
            self.cursor.skip_text();
            if self.cursor.peek().map(|t| !t.is_end_for(&elem)).unwrap_or(false) {
                self.log_at(
                    &elem,
                    DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                    "The <otherwise> element should have one child element.",
                );
            }
        }

        self.cursor.skip_past_end(&elem);
    }

    /// Copies the presentation attributes of `elem` to `node`, and checks that the other
    /// attributes the reader understands are only used where they are allowed.
    fn read_attributes(&mut self, node: &mut MathNode, elem: &XmlToken) {
        let name = elem.name.as_str();
        let format = self.format();

        if let Some(id) = elem.non_empty_attribute("id") {
            node.id = Some(id.to_string());
        }
        if let Some(class) = elem.non_empty_attribute("class") {
            node.class = Some(class.to_string());
        }
        if let Some(style) = elem.non_empty_attribute("style") {
            node.style = Some(style.to_string());
        }

        if elem.non_empty_attribute("type").is_some() && name != "cn" {
            self.log_at(
                elem,
                DiagnosticCode::DisallowedMathTypeAttributeUse,
                format!("The type attribute cannot be used on <{}>.", name),
            );
        }

        if elem.non_empty_attribute("encoding").is_some() && name != "csymbol" {
            self.log_at(
                elem,
                DiagnosticCode::DisallowedMathMLEncodingUse,
                format!("The encoding attribute cannot be used on <{}>.", name),
            );
        }

        if elem.non_empty_attribute("definitionURL").is_some() {
            let allowed = name == "csymbol"
                || name == "semantics"
                || (name == "ci" && format.allows_ci_definition_url());
            if !allowed {
                self.log_at(
                    elem,
                    DiagnosticCode::DisallowedDefinitionURLUse,
                    format!("The definitionURL attribute cannot be used on <{}>.", name),
                );
            }
        }

        if elem.non_empty_attribute("units").is_some() {
            if format.level > 2 {
                if name != "cn" {
                    self.log_at(
                        elem,
                        DiagnosticCode::DisallowedMathUnitsUse,
                        format!("The units attribute cannot be used on <{}>.", name),
                    );
                }
            } else {
                self.log_at(
                    elem,
                    DiagnosticCode::InvalidMathMLAttribute,
                    format!("Units cannot be given in level {} maths.", format.level),
                );
            }
        }
    }

    fn read_apply(&mut self, node: &mut MathNode, elem: &XmlToken) {
        if elem.is_self_closing() {
            return;
        }

        // An application of nothing is just an unknown node
        self.cursor.skip_text();
        let operator = match self.cursor.peek() {
            Some(token) if token.is_start() => token.name.clone(),
            _ => return,
        };

        if NOT_OPERATORS.contains(&operator.as_str()) {
            self.log_at(
                elem,
                DiagnosticCode::BadMathML,
                format!("<{}> is not an operator and cannot be used directly following an <apply> tag.", operator),
            );
        }

        // The operator decides the kind of the application itself
        self.read_into(node);
        if node.kind.is_name() {
            node.kind = NodeKind::Function(Function::Call);
        }

        let rejection = match node.kind {
            NodeKind::Number(_) => {
                Some("A number is not an operator and cannot be used directly following an <apply> tag.".to_string())
            }
            NodeKind::Constant(_) => Some(format!(
                "<{}> is not an operator and cannot be used directly following an <apply> tag.",
                dictionary::element_name(node.kind).unwrap_or(operator.as_str()),
            )),
            NodeKind::Piecewise => Some(
                "A <piecewise> element is not an operator and cannot be used directly following an <apply> tag."
                    .to_string(),
            ),
            _ => None,
        };

        match rejection {
            Some(message) => {
                self.log_at(elem, DiagnosticCode::BadMathML, message);
                node.kind = NodeKind::Unknown;
                node.units = None;
                node.children.clear();
            }
            None => self.read_arguments(node, elem),
        }
    }

    /// Reads children into `node` until the end tag of `elem`.
    fn read_arguments(&mut self, node: &mut MathNode, elem: &XmlToken) {
        if elem.is_self_closing() {
            return;
        }

        loop {
            self.cursor.skip_text();
            match self.cursor.peek().map(|t| (t.is_start(), t.name == "piece")) {
                Some((true, _)) => (),

                // A stray `</piece>`, left by a `<piece>` which was read as an operator
                Some((false, true)) => {
                    self.cursor.next();
                    continue;
                }
                _ => break,
            }

            if node.kind.is_n_ary_operator() {
                node.reduce_binary();
            }

            let nested_math = self.cursor.peek().map(|t| t.name == "math").unwrap_or(false);
            if nested_math {
                self.log_at(elem, DiagnosticCode::BadMathMLNodeType, "<math> incorrectly used.");
            }

            let child = self.read_node();

            self.cursor.skip_text();
            let (next_name, next_is_end) = match self.cursor.peek() {
                Some(token) => (token.name.clone(), token.is_end()),
                None => (String::new(), false),
            };

            if elem.name == "lambda"
                && !next_name.is_empty()
                && next_name != "lambda"
                && next_name != "bvar"
                && !self.is_node_tag(&next_name)
            {
                self.log_at(
                    elem,
                    DiagnosticCode::BadMathMLNodeType,
                    format!("<{}> cannot be used directly following a <bvar> element.", next_name),
                );
            }

            if next_name == "math" {
                break;
            }
            if !nested_math {
                node.children.push(child);
            }

            if next_name == "piece" {
                if node.children.len() % 2 != 0 {
                    self.log_at(
                        elem,
                        DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                        "The <piece> element should have two child elements.",
                    );
                }
                if next_is_end {
                    self.cursor.next();
                }
            } else if next_name == "otherwise" && node.children.len() % 2 != 1 {
                self.log_at(
                    elem,
                    DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                    "The <otherwise> element should have one child element.",
                );
            }
        }
    }

    fn read_semantics(&mut self, node: &mut MathNode, elem: &XmlToken) {
        node.semantics = true;
        if elem.is_self_closing() {
            return;
        }

        let url = elem.non_empty_attribute("definitionURL").map(str::to_string);
        self.read_into(node);
        node.semantics = true;
        if url.is_some() {
            node.definition_url = url;
        }

        loop {
            self.cursor.skip_text();
            let token = match self.cursor.peek().cloned() {
                Some(token) if token.is_start() => token,
                _ => break,
            };

            if self.is_node_tag(&token.name) {
                let message = format!(
                    "Unexpected element encountered. The element <{}> should not be encountered here.",
                    token.name,
                );
                self.log_at(&token, DiagnosticCode::InvalidMathElement, message);
                self.skip_element();
            } else if token.name == "annotation" || token.name == "annotation-xml" {
                match self.cursor.read_element_markup() {
                    Some(markup) => node.annotations.push(markup),
                    None => self.skip_element(),
                }
            } else {
                self.skip_element();
            }
        }
    }

    fn skip_element(&mut self) {
        if let Some(token) = self.cursor.next() {
            self.cursor.skip_past_end(&token);
        }
    }

    /// Reads `<ci>` and `<csymbol>`.
    fn read_name(&mut self, node: &mut MathNode, elem: &XmlToken) {
        if elem.name == "csymbol" {
            let url = elem.attribute("definitionURL").unwrap_or("");
            let format = self.settings.format;

            match self.registry.resolve(url) {
                // Without a format, any URL is kept as an opaque csymbol
                None if format.is_none() => {
                    node.kind = NodeKind::Function(Function::Csymbol);
                    node.definition_url = Some(url.to_string()).filter(|u| !u.is_empty());
                }
                Some(kind) if is_valid_csymbol(format, kind) => {
                    node.kind = kind;
                    if !kind.is_core_symbol() {
                        node.definition_url = Some(url.to_string());
                    }
                }
                _ => {
                    self.log_at(
                        elem,
                        DiagnosticCode::BadCsymbolDefinitionURLValue,
                        format!("The csymbol definitionURL '{}' is not recognised.", url),
                    );
                    node.kind = NodeKind::Function(Function::Call);
                }
            }
        } else {
            node.kind = NodeKind::Name(NameKind::Identifier);
            if let Some(url) = elem.non_empty_attribute("definitionURL") {
                node.definition_url = Some(url.to_string());
            }
        }

        if !elem.is_self_closing() && self.cursor.peek().map(XmlToken::is_text).unwrap_or(false) {
            if let Some(text) = self.cursor.next() {
                node.name = Some(text.text.trim().to_string());
            }
        }
    }

    /// Reads `<cn>`. On failure the node is left unknown.
    fn read_number(&mut self, node: &mut MathNode, elem: &XmlToken) {
        let kind = elem.non_empty_attribute("type").unwrap_or("real").trim();

        let units = elem.non_empty_attribute("units").map(str::to_string);
        if let Some(units) = &units {
            if !number::is_valid_unit_sid(units) {
                self.log_at(
                    elem,
                    DiagnosticCode::InvalidUnitIdSyntax,
                    format!("The units attribute '{}' does not conform to the syntax.", units),
                );
            }
        }

        let (first, second) = self.read_number_text(elem);
        match number::decode(kind, &first, second.as_deref()) {
            Ok(value) => {
                node.kind = NodeKind::Number(value);
                node.units = units;
            }
            Err(error) => {
                let code = match error {
                    NumberError::Real(_) => DiagnosticCode::FailedMathMLReadOfDouble,
                    NumberError::Integer(_) => DiagnosticCode::FailedMathMLReadOfInteger,
                    NumberError::ENotation(_) => DiagnosticCode::FailedMathMLReadOfExponential,
                    NumberError::Rational(_) => DiagnosticCode::FailedMathMLReadOfRational,
                    NumberError::UnsupportedType(_) => DiagnosticCode::DisallowedMathTypeAttributeValue,
                };
                self.log_at(elem, code, error.to_string());
                node.kind = NodeKind::Unknown;
            }
        }
    }

    /// The text of a `<cn>` before and after its `<sep/>`, if it has one.
    fn read_number_text(&mut self, elem: &XmlToken) -> (String, Option<String>) {
        if elem.is_self_closing() {
            return (String::new(), None);
        }

        let first = self.next_text().unwrap_or_default();
        let has_separator = self.cursor.peek().map(|t| t.is_start() && t.name == "sep").unwrap_or(false);
        if !has_separator {
            return (first, None);
        }

        self.skip_element();
        (first, Some(self.next_text().unwrap_or_default()))
    }

    fn next_text(&mut self) -> Option<String> {
        if self.cursor.peek().map(XmlToken::is_text).unwrap_or(false) {
            self.cursor.next().map(|t| t.text)
        } else {
            None
        }
    }
}

/// `log` without a base and `root` without a degree get their defaults, 10 and 2. The default is
/// flagged `implicit` and left without units; see `MathNode::implicit_integer`.
fn add_default_argument(node: &mut MathNode) {
    if node.children.len() != 1 {
        return;
    }
    match node.kind {
        NodeKind::Function(Function::Log) => node.prepend_child(MathNode::implicit_integer(10)),
        NodeKind::Function(Function::Root) => node.prepend_child(MathNode::implicit_integer(2)),
        _ => (),
    }
}
