//! The fixed table of element names the reader understands without any extension.

use std::cmp::Ordering;

use crate::Number;

use super::kind::{Constant, Function, Logical, NodeKind, Operator, Relational};

#[derive(PartialEq, Debug)]
pub struct ElementEntry {
    pub name: &'static str,
    pub kind: NodeKind,

    /// Whether this element names something applied to arguments, as opposed to an operator,
    /// a value or a structural element.
    pub is_function: bool,
}

const fn entry(name: &'static str, kind: NodeKind, is_function: bool) -> ElementEntry {
    ElementEntry { name, kind, is_function }
}

const fn function(name: &'static str, f: Function) -> ElementEntry {
    entry(name, NodeKind::Function(f), true)
}

const fn structural(name: &'static str) -> ElementEntry {
    entry(name, NodeKind::Unknown, false)
}

/// Sorted by name, ignoring ASCII case, so that `lookup` can binary search it.
pub static ELEMENTS: [ElementEntry; 69] = [
    function("abs", Function::Abs),
    entry("and", NodeKind::Logical(Logical::And), true),
    structural("annotation"),
    structural("annotation-xml"),
    structural("apply"),
    function("arccos", Function::Arccos),
    function("arccosh", Function::Arccosh),
    function("arccot", Function::Arccot),
    function("arccoth", Function::Arccoth),
    function("arccsc", Function::Arccsc),
    function("arccsch", Function::Arccsch),
    function("arcsec", Function::Arcsec),
    function("arcsech", Function::Arcsech),
    function("arcsin", Function::Arcsin),
    function("arcsinh", Function::Arcsinh),
    function("arctan", Function::Arctan),
    function("arctanh", Function::Arctanh),
    structural("bvar"),
    function("ceiling", Function::Ceiling),
    structural("ci"),
    structural("cn"),
    function("cos", Function::Cos),
    function("cosh", Function::Cosh),
    function("cot", Function::Cot),
    function("coth", Function::Coth),
    function("csc", Function::Csc),
    function("csch", Function::Csch),
    structural("csymbol"),
    structural("degree"),
    entry("divide", NodeKind::Operator(Operator::Divide), false),
    entry("eq", NodeKind::Relational(Relational::Eq), true),
    function("exp", Function::Exp),
    entry("exponentiale", NodeKind::Constant(Constant::E), false),
    function("factorial", Function::Factorial),
    entry("false", NodeKind::Constant(Constant::False), false),
    function("floor", Function::Floor),
    entry("geq", NodeKind::Relational(Relational::Geq), true),
    entry("gt", NodeKind::Relational(Relational::Gt), true),
    entry("infinity", NodeKind::Number(Number::Real(f64::INFINITY)), false),
    entry("lambda", NodeKind::Lambda, false),
    entry("leq", NodeKind::Relational(Relational::Leq), true),
    function("ln", Function::Ln),
    function("log", Function::Log),
    structural("logbase"),
    entry("lt", NodeKind::Relational(Relational::Lt), true),
    structural("math"),
    entry("minus", NodeKind::Operator(Operator::Minus), false),
    entry("neq", NodeKind::Relational(Relational::Neq), true),
    entry("not", NodeKind::Logical(Logical::Not), true),
    entry("notanumber", NodeKind::Number(Number::Real(f64::NAN)), false),
    entry("or", NodeKind::Logical(Logical::Or), true),
    structural("otherwise"),
    entry("pi", NodeKind::Constant(Constant::Pi), false),
    structural("piece"),
    entry("piecewise", NodeKind::Piecewise, false),
    entry("plus", NodeKind::Operator(Operator::Plus), false),
    entry("power", NodeKind::Operator(Operator::Power), false),
    function("root", Function::Root),
    function("sec", Function::Sec),
    function("sech", Function::Sech),
    structural("semantics"),
    structural("sep"),
    function("sin", Function::Sin),
    function("sinh", Function::Sinh),
    function("tan", Function::Tan),
    function("tanh", Function::Tanh),
    entry("times", NodeKind::Operator(Operator::Times), false),
    entry("true", NodeKind::Constant(Constant::True), false),
    entry("xor", NodeKind::Logical(Logical::Xor), true),
];

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Finds the entry for an element name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static ElementEntry> {
    ELEMENTS
        .binary_search_by(|entry| compare_ignoring_case(entry.name, name))
        .ok()
        .map(|index| &ELEMENTS[index])
}

/// The element written for a kind, for every kind which has one in the table.
pub fn element_name(kind: NodeKind) -> Option<&'static str> {
    if kind.is_unknown() {
        return None;
    }

    // NaN never equals itself, so it cannot be found by comparing kinds
    if let NodeKind::Number(n) = kind {
        if n.is_nan() {
            return Some("notanumber");
        }
    }

    ELEMENTS.iter().find(|e| e.kind == kind).map(|e| e.name)
}

/// Like `element_name`, but only for kinds which are applied as functions.
pub fn function_name(kind: NodeKind) -> Option<&'static str> {
    ELEMENTS.iter().find(|e| e.is_function && e.kind == kind).map(|e| e.name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        for pair in ELEMENTS.windows(2) {
            assert_eq!(
                compare_ignoring_case(pair[0].name, pair[1].name),
                Ordering::Less,
                "{} should sort before {}", pair[0].name, pair[1].name,
            );
        }
    }

    #[test]
    fn test_every_name_is_found() {
        for entry in ELEMENTS.iter() {
            assert_eq!(lookup(entry.name).map(|e| e.name), Some(entry.name));
        }
    }
}
