use crate::Number;

use super::kind::{Function, NameKind, NodeKind};

/// One node of an expression tree. Children are owned, so dropping the root drops the whole tree.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MathNode {
    pub kind: NodeKind,
    pub children: Vec<MathNode>,

    /// The identifier of a name, or the function name of a call or csymbol.
    pub name: Option<String>,

    /// The unit identifier of a number.
    pub units: Option<String>,

    pub definition_url: Option<String>,

    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Option<String>,

    /// This node was wrapped in `<bvar>`, making it a bound variable of its parent lambda.
    pub bvar: bool,

    /// This node was wrapped in `<semantics>`. Any annotations from the wrapper are kept verbatim
    /// in `annotations`, in order.
    pub semantics: bool,
    pub annotations: Vec<String>,

    /// This node was not in the markup, but was inserted as the default argument of its parent
    /// (the base of `log`, or the degree of `root`).
    pub implicit: bool,
}

impl MathNode {
    pub fn new(kind: NodeKind) -> MathNode {
        MathNode { kind, ..Default::default() }
    }

    pub fn with_children(kind: NodeKind, children: Vec<MathNode>) -> MathNode {
        MathNode { kind, children, ..Default::default() }
    }

    pub fn number(number: Number) -> MathNode {
        MathNode::new(NodeKind::Number(number))
    }

    pub fn integer(value: i64) -> MathNode {
        MathNode::number(Number::Integer(value))
    }

    pub fn real(value: f64) -> MathNode {
        MathNode::number(Number::Real(value))
    }

    pub fn identifier(name: impl Into<String>) -> MathNode {
        MathNode { name: Some(name.into()), ..MathNode::new(NodeKind::Name(NameKind::Identifier)) }
    }

    /// A call to a user-defined function.
    pub fn call(name: impl Into<String>, arguments: Vec<MathNode>) -> MathNode {
        MathNode {
            name: Some(name.into()),
            ..MathNode::with_children(NodeKind::Function(Function::Call), arguments)
        }
    }

    /// The default argument inserted for a `log` without a base or a `root` without a degree.
    ///
    /// It carries no units, not even `dimensionless`. Giving it one would make `has_units` true
    /// for a tree whose text never mentioned units, and the writer would then declare the SBML
    /// namespace on `<math>`.
    pub fn implicit_integer(value: i64) -> MathNode {
        MathNode { implicit: true, ..MathNode::integer(value) }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> MathNode {
        self.units = Some(units.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> MathNode {
        self.id = Some(id.into());
        self
    }

    pub fn as_bvar(mut self) -> MathNode {
        self.bvar = true;
        self
    }

    pub fn number_value(&self) -> Option<Number> {
        match self.kind {
            NodeKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Whether any number in this tree carries a unit.
    pub fn has_units(&self) -> bool {
        (self.kind.is_number() && self.units.is_some()) || self.children.iter().any(MathNode::has_units)
    }

    /// The body of a lambda, which is its last child unless that child is a bound variable.
    pub fn lambda_body(&self) -> Option<&MathNode> {
        self.children.last().filter(|c| !c.bvar)
    }

    /// The bound variables of a lambda.
    pub fn bound_variables(&self) -> impl Iterator<Item = &MathNode> {
        self.children.iter().filter(|c| c.bvar)
    }

    /// Whether this node carries nothing of its own beyond kind and children, so writing it can
    /// be merged into its parent's `<apply>`.
    pub fn is_plain_chain_link(&self) -> bool {
        !self.semantics
            && self.id.is_none()
            && self.class.is_none()
            && self.style.is_none()
            && self.definition_url.is_none()
    }

    pub fn prepend_child(&mut self, child: MathNode) {
        self.children.insert(0, child);
    }

    /// If this node has exactly two children, moves them into a new node of the same kind which
    /// becomes this node's only child. Reading `<plus/>` arguments one at a time and calling this
    /// before each builds a left-nested binary chain.
    pub fn reduce_binary(&mut self) {
        if self.children.len() == 2 {
            let pair = std::mem::take(&mut self.children);
            self.children.push(MathNode::with_children(self.kind, pair));
        }
    }
}
