/// Wraps expression markup in a complete `<math>` document.
macro_rules! mathml {
    ($s:literal) => {
        concat!(
            "<?xml version='1.0' encoding='ascii'?>\n",
            "<math xmlns='http://www.w3.org/1998/Math/MathML'>\n",
            $s,
            "\n</math>",
        )
    };
}

/// The expected output of the writer for a `<math>` element holding already-indented content.
macro_rules! written {
    ($s:literal) => {
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">\n",
            $s,
            "\n</math>",
        )
    };
}

/// Reads a document, returning the outcome with its log.
macro_rules! read {
    ($s:expr, $settings:expr $(,)?) => {
        crate::read_mathml($s, &$settings).unwrap()
    };

    ($s:expr $(,)?) => { read!($s, crate::ReadSettings::default()) };
}

/// Reads expression markup wrapped in `<math>`, expecting a tree.
macro_rules! read_math {
    ($s:literal $(, $settings:expr)? $(,)?) => {
        read!(mathml!($s) $(, $settings)?).math.unwrap()
    };
}

macro_rules! ci {
    ($x:ident) => { crate::MathNode::identifier(stringify!($x)) };
}

macro_rules! int {
    ($n:expr) => { crate::MathNode::integer($n) };
}

macro_rules! real {
    ($n:expr) => { crate::MathNode::real($n) };
}

/// A node of the given kind with the given children.
macro_rules! node {
    ($kind:expr $(, $child:expr)* $(,)?) => {
        crate::MathNode::with_children($kind, vec![ $($child),* ])
    };
}

macro_rules! op {
    (+) => { crate::NodeKind::Operator(crate::Operator::Plus) };
    (-) => { crate::NodeKind::Operator(crate::Operator::Minus) };
    (*) => { crate::NodeKind::Operator(crate::Operator::Times) };
    (/) => { crate::NodeKind::Operator(crate::Operator::Divide) };
    (^) => { crate::NodeKind::Operator(crate::Operator::Power) };
}

macro_rules! func {
    ($f:ident) => { crate::NodeKind::Function(crate::Function::$f) };
}
