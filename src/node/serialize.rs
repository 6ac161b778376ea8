use crate::extension::{MathExtension, URL_AVOGADRO, URL_DELAY, URL_TIME};
use crate::number::{split_exponent, Number};
use crate::settings::WriteSettings;
use crate::xml::XmlOutputStream;

use super::dictionary;
use super::kind::{Function, NameKind, NodeKind, Operator};
use super::math::MathNode;

pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Renders expression trees as content MathML.
///
/// Writing never fails. A tree which could not have come from the reader is still written, in
/// whatever shape its kinds suggest.
pub struct MathWriter<'a> {
    pub out: XmlOutputStream,
    pub settings: &'a WriteSettings,
    pub extension: &'a dyn MathExtension,
}

impl<'a> MathWriter<'a> {
    pub fn new(settings: &'a WriteSettings, extension: &'a dyn MathExtension) -> Self {
        MathWriter { out: XmlOutputStream::new(), settings, extension }
    }

    /// Writes a complete `<math>` document. With no node, the element is empty.
    pub fn write_math(&mut self, node: Option<&MathNode>) {
        if self.settings.xml_declaration {
            self.out.write_xml_decl();
        }

        self.out.start_element("math");
        self.out.write_attribute("xmlns", MATHML_NAMESPACE);
        if let Some(node) = node {
            if node.has_units() {
                let uri = self.settings.format.unwrap_or_default().namespace_uri();
                self.out.write_attribute("xmlns:sbml", &uri);
            }
            self.write_node(node);
        }
        self.out.end_element("math");
    }

    pub fn into_string(self) -> String {
        self.out.into_string()
    }

    pub fn write_node(&mut self, node: &MathNode) {
        if node.semantics {
            self.write_semantics(node);
        } else {
            self.write_body(node);
        }
    }

    /// Writes a node without its `<semantics>` wrapper, if it has one.
    fn write_body(&mut self, node: &MathNode) {
        match node.kind {
            NodeKind::Number(number) => self.write_number(node, number),
            NodeKind::Name(NameKind::Identifier) => self.write_ci(node),
            NodeKind::Name(_) => self.write_csymbol(node),
            NodeKind::Constant(_) => {
                if let Some(name) = dictionary::element_name(node.kind) {
                    self.write_empty(name, node);
                }
            }
            NodeKind::Operator(operator) => self.write_operator(node, operator),
            NodeKind::Lambda => self.write_lambda(node),
            NodeKind::Piecewise => self.write_piecewise(node),
            NodeKind::Unknown => {
                self.out.start_element("apply");
                self.write_attributes(node);
                self.write_children(&node.children);
                self.out.end_element("apply");
            }
            NodeKind::Extension(_) => match self.extension.element_name_for(node.kind) {
                Some(name) if self.extension.is_node_tag(name) => {
                    self.out.start_element(name);
                    self.write_attributes(node);
                    self.write_children(&node.children);
                    self.out.end_element(name);
                }
                _ => self.write_function(node),
            },
            NodeKind::Function(_) | NodeKind::Logical(_) | NodeKind::Relational(_) => self.write_function(node),
        }
    }

    fn write_children(&mut self, children: &[MathNode]) {
        for child in children {
            self.write_node(child);
        }
    }

    /// Writes the `id`, `class` and `style` of a node onto the start tag just written.
    fn write_attributes(&mut self, node: &MathNode) {
        if let Some(id) = &node.id {
            self.out.write_attribute("id", id);
        }
        if let Some(class) = &node.class {
            self.out.write_attribute("class", class);
        }
        if let Some(style) = &node.style {
            self.out.write_attribute("style", style);
        }
    }

    fn write_empty(&mut self, name: &str, node: &MathNode) {
        self.out.start_element(name);
        self.write_attributes(node);
        self.out.end_element(name);
    }

    fn write_semantics(&mut self, node: &MathNode) {
        self.out.start_element("semantics");
        self.write_attributes(node);
        if let Some(url) = &node.definition_url {
            self.out.write_attribute("definitionURL", url);
        }

        self.write_body(node);
        for annotation in &node.annotations {
            self.out.write_markup(annotation);
        }
        self.out.end_element("semantics");
    }

    fn write_number(&mut self, node: &MathNode, number: Number) {
        match number {
            Number::Real(value) if value.is_nan() => {
                self.write_empty("notanumber", node);
                return;
            }
            Number::Real(value) if value == f64::INFINITY => {
                self.write_empty("infinity", node);
                return;
            }
            Number::Real(value) if value == f64::NEG_INFINITY => {
                self.out.start_element("apply");
                self.out.set_auto_indent(false);
                self.out.write_chars(" ");
                self.out.start_end_element("minus");
                self.out.write_chars(" ");
                self.write_empty("infinity", node);
                self.out.write_chars(" ");
                self.out.end_element("apply");
                self.out.set_auto_indent(true);
                return;
            }
            _ => (),
        }

        self.out.start_element("cn");
        self.write_attributes(node);
        if let Some(units) = &node.units {
            if self.settings.writes_units() {
                self.out.write_attribute("sbml:units", units);
            }
        }
        self.out.set_auto_indent(false);

        match number {
            Number::Integer(value) => {
                self.out.write_attribute("type", "integer");
                self.out.write_chars(&format!(" {} ", value));
            }
            Number::Rational(numerator, denominator) => {
                self.out.write_attribute("type", "rational");
                self.out.write_chars(&format!(" {} ", numerator));
                self.out.start_end_element("sep");
                self.out.write_chars(&format!(" {} ", denominator));
            }
            Number::ENotation(mantissa, exponent) => self.write_e_notation(mantissa, exponent),
            Number::Real(value) => match split_exponent(value) {
                (_, Some(_)) => self.write_e_notation(value, 0),
                (text, None) => self.out.write_chars(&format!(" {} ", text)),
            },
        }

        self.out.end_element("cn");
        self.out.set_auto_indent(true);
    }

    /// Writes a mantissa and exponent as `type="e-notation"` content. A mantissa too large or
    /// small to print without an exponent has it folded into `exponent`, unless that would
    /// overflow, in which case the mantissa is spelled out in full instead.
    fn write_e_notation(&mut self, mantissa: f64, exponent: i64) {
        let (mantissa, exponent) = match split_exponent(mantissa) {
            (text, None) => (text, exponent),
            (text, Some(extra)) => match exponent.checked_add(extra) {
                Some(folded) => (text, folded),
                None => (mantissa.to_string(), exponent),
            },
        };

        self.out.write_attribute("type", "e-notation");
        self.out.write_chars(&format!(" {} ", mantissa));
        self.out.start_end_element("sep");
        self.out.write_chars(&format!(" {} ", exponent));
    }

    fn write_ci(&mut self, node: &MathNode) {
        self.out.start_element("ci");
        self.out.set_auto_indent(false);
        self.write_attributes(node);
        if let Some(url) = &node.definition_url {
            self.out.write_attribute("definitionURL", url);
        }
        if let Some(name) = &node.name {
            self.out.write_chars(&format!(" {} ", name));
        }
        self.out.end_element("ci");
        self.out.set_auto_indent(true);
    }

    fn write_csymbol(&mut self, node: &MathNode) {
        let url = match node.kind {
            NodeKind::Name(NameKind::Time) => URL_TIME,
            NodeKind::Name(NameKind::Avogadro) => URL_AVOGADRO,
            NodeKind::Function(Function::Delay) => URL_DELAY,
            kind => self
                .extension
                .csymbol_url_for(kind)
                .or(node.definition_url.as_deref())
                .unwrap_or(""),
        };

        self.out.start_element("csymbol");
        self.out.set_auto_indent(false);
        self.write_attributes(node);
        self.out.write_attribute("encoding", "text");
        self.out.write_attribute("definitionURL", url);
        if let Some(name) = &node.name {
            self.out.write_chars(&format!(" {} ", name));
        }
        self.out.end_element("csymbol");
        self.out.set_auto_indent(true);
    }

    fn write_operator(&mut self, node: &MathNode, operator: Operator) {
        self.out.start_element("apply");
        if let Some(name) = dictionary::element_name(node.kind) {
            self.write_empty(name, node);
        }

        if matches!(operator, Operator::Plus | Operator::Times) {
            self.write_n_ary_arguments(node);
        } else {
            self.write_children(&node.children);
        }
        self.out.end_element("apply");
    }

    /// Unrolls a binary chain of the same plus or times into one flat argument list. A node which
    /// already holds more than two arguments is written as it is.
    fn write_n_ary_arguments(&mut self, node: &MathNode) {
        if node.children.len() > 2 {
            self.write_children(&node.children);
            return;
        }

        for child in &node.children {
            if child.kind == node.kind && child.is_plain_chain_link() {
                self.write_n_ary_arguments(child);
            } else {
                self.write_node(child);
            }
        }
    }

    fn write_lambda(&mut self, node: &MathNode) {
        self.out.start_element("lambda");
        self.write_attributes(node);

        if let Some((last, variables)) = node.children.split_last() {
            for variable in variables {
                self.out.start_element("bvar");
                self.write_node(variable);
                self.out.end_element("bvar");
            }

            // A lambda read without a body still ends with a bound variable
            if last.bvar {
                self.out.start_element("bvar");
                self.write_node(last);
                self.out.end_element("bvar");
            } else {
                self.write_node(last);
            }
        }

        self.out.end_element("lambda");
    }

    fn write_piecewise(&mut self, node: &MathNode) {
        self.out.start_element("piecewise");
        self.write_attributes(node);

        let mut pieces = node.children.chunks_exact(2);
        for piece in &mut pieces {
            self.out.start_element("piece");
            self.write_children(piece);
            self.out.end_element("piece");
        }
        if let Some(otherwise) = pieces.remainder().first() {
            self.out.start_element("otherwise");
            self.write_node(otherwise);
            self.out.end_element("otherwise");
        }

        self.out.end_element("piecewise");
    }

    fn write_function(&mut self, node: &MathNode) {
        self.out.start_element("apply");

        match node.kind {
            NodeKind::Function(Function::Call) => self.write_ci(node),
            NodeKind::Function(Function::Delay | Function::Csymbol) => self.write_csymbol(node),
            kind => {
                if let Some(name) = dictionary::function_name(kind) {
                    self.write_empty(name, node);
                } else if self.extension.csymbol_url_for(kind).is_some() {
                    self.write_csymbol(node);
                } else if let Some(name) = self.extension.element_name_for(kind) {
                    self.write_empty(name, node);
                }
            }
        }

        let wrapper = match node.kind {
            NodeKind::Function(Function::Log) => Some("logbase"),
            NodeKind::Function(Function::Root) => Some("degree"),
            _ => None,
        };
        match (wrapper, node.children.split_first()) {
            (Some(wrapper), Some((first, rest))) if !rest.is_empty() => {
                // A default argument is left for the next read to restore
                if !first.implicit {
                    self.out.start_element(wrapper);
                    self.write_node(first);
                    self.out.end_element(wrapper);
                }
                self.write_children(rest);
            }
            _ => self.write_children(&node.children),
        }

        self.out.end_element("apply");
    }
}
