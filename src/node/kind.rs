use crate::Number;

/// What a `MathNode` represents. Each category carries just enough to tell its members apart;
/// everything else (names, units, attributes) lives on the node.
#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub enum NodeKind {
    /// A literal. Not-a-number and infinity are reals, not kinds of their own.
    Number(Number),

    /// A reference to a named quantity. The name itself is the node's `name`.
    Name(NameKind),

    Constant(Constant),

    /// Arithmetic which the reader keeps binary, although plus and times may be written with any
    /// number of arguments.
    Operator(Operator),

    Function(Function),
    Logical(Logical),
    Relational(Relational),

    /// A function definition. The children are its bound variables followed by its body.
    Lambda,

    /// Children in (value, condition) pairs, optionally followed by one "otherwise" value.
    Piecewise,

    /// A kind defined entirely by a `MathExtension`, which is the only thing which knows what the
    /// code means.
    Extension(u32),

    #[default]
    Unknown,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum NameKind {
    Identifier,
    Time,
    Avogadro,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Constant {
    Pi,
    E,
    True,
    False,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Function {
    Abs,
    Arccos,
    Arccosh,
    Arccot,
    Arccoth,
    Arccsc,
    Arccsch,
    Arcsec,
    Arcsech,
    Arcsin,
    Arcsinh,
    Arctan,
    Arctanh,
    Ceiling,
    Cos,
    Cosh,
    Cot,
    Coth,
    Csc,
    Csch,
    Exp,
    Factorial,
    Floor,
    Ln,
    Log,
    Root,
    Sec,
    Sech,
    Sin,
    Sinh,
    Tan,
    Tanh,

    /// `delay(x, t)`, only expressible as a csymbol.
    Delay,

    /// `rateOf(x)`, only expressible as a csymbol.
    RateOf,

    Max,
    Min,
    Quotient,
    Rem,

    /// A call to a user-defined function, named by the node's `name`.
    Call,

    /// A csymbol whose definition URL is not a symbol the reader knows. The URL is kept in the
    /// node's `definition_url`.
    Csymbol,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Logical {
    And,
    Or,
    Xor,
    Not,
    Implies,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Relational {
    Eq,
    Neq,
    Gt,
    Lt,
    Geq,
    Leq,
}

impl NodeKind {
    pub fn is_number(&self) -> bool {
        matches!(self, NodeKind::Number(_))
    }

    pub fn is_name(&self) -> bool {
        matches!(self, NodeKind::Name(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, NodeKind::Constant(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, NodeKind::Unknown)
    }

    /// Returns true for plus and times, which may be written with any number of arguments.
    pub fn is_n_ary_operator(&self) -> bool {
        matches!(self, NodeKind::Operator(Operator::Plus | Operator::Times))
    }

    /// The symbols whose csymbol URLs are built in rather than provided by an extension.
    pub fn is_core_symbol(&self) -> bool {
        matches!(
            self,
            NodeKind::Name(NameKind::Time | NameKind::Avogadro) | NodeKind::Function(Function::Delay)
        )
    }
}
