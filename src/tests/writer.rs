use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{
    write_mathml, write_mathml_to_string, Constant, MathNode, NameKind, NodeKind, Number, WriteSettings,
};

#[rstest]
#[case(real!(12345.7), "  <cn> 12345.7 </cn>")]
#[case(real!(-0.5), "  <cn> -0.5 </cn>")]
#[case(real!(2e30), "  <cn type=\"e-notation\"> 2 <sep/> 30 </cn>")]
#[case(real!(1.5e-7), "  <cn type=\"e-notation\"> 1.5 <sep/> -7 </cn>")]
#[case(int!(42), "  <cn type=\"integer\"> 42 </cn>")]
#[case(MathNode::number(Number::Rational(1, 3)), "  <cn type=\"rational\"> 1 <sep/> 3 </cn>")]
#[case(MathNode::number(Number::ENotation(12.3, 5)), "  <cn type=\"e-notation\"> 12.3 <sep/> 5 </cn>")]
#[case(MathNode::number(Number::ENotation(2e20, 1)), "  <cn type=\"e-notation\"> 2 <sep/> 21 </cn>")]
#[case(real!(f64::NAN), "  <notanumber/>")]
#[case(real!(f64::INFINITY), "  <infinity/>")]
#[case(real!(f64::NEG_INFINITY), "  <apply> <minus/> <infinity/> </apply>")]
fn test_numbers(#[case] node: MathNode, #[case] expected: &str) {
    let expected = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<math xmlns=\"http://www.w3.org/1998/Math/MathML\">\n{}\n</math>",
        expected,
    );
    assert_eq!(write_mathml_to_string(&node), expected);
}

#[test]
fn test_empty_math() {
    assert_eq!(
        write_mathml(None, &WriteSettings::default()),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<math xmlns=\"http://www.w3.org/1998/Math/MathML\"/>",
    );

    let settings = WriteSettings { xml_declaration: false, ..Default::default() };
    assert_eq!(write_mathml(None, &settings), "<math xmlns=\"http://www.w3.org/1998/Math/MathML\"/>");
}

#[test]
fn test_units() {
    let node = int!(1).with_units("mole");
    assert_eq!(
        write_mathml(Some(&node), &WriteSettings::with_format(3, 1)),
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" xmlns:sbml=\"http://www.sbml.org/sbml/level3/version1/core\">\n",
            "  <cn sbml:units=\"mole\" type=\"integer\"> 1 </cn>\n",
            "</math>",
        ),
    );

    // The namespace is still declared, but level 2 has nowhere to put units
    assert_eq!(
        write_mathml(Some(&node), &WriteSettings::with_format(2, 4)),
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" xmlns:sbml=\"http://www.sbml.org/sbml/level2/version4\">\n",
            "  <cn type=\"integer\"> 1 </cn>\n",
            "</math>",
        ),
    );
}

#[test]
fn test_attributes() {
    let mut node = ci!(x).with_id("a");
    node.class = Some("b".to_string());
    node.style = Some("c".to_string());

    assert_eq!(
        write_mathml_to_string(&node),
        written!("  <ci id=\"a\" class=\"b\" style=\"c\"> x </ci>"),
    );
}

#[test]
fn test_n_ary_plus_is_flattened() {
    let node = node!(op!(+), node!(op!(+), node!(op!(+), int!(1), int!(2)), int!(3)), ci!(x));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <plus/>
    <cn type=\"integer\"> 1 </cn>
    <cn type=\"integer\"> 2 </cn>
    <cn type=\"integer\"> 3 </cn>
    <ci> x </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_nested_operators_keep_structure() {
    // A different operator breaks the chain
    let node = node!(op!(*), node!(op!(+), ci!(a), ci!(b)), ci!(c));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <times/>
    <apply>
      <plus/>
      <ci> a </ci>
      <ci> b </ci>
    </apply>
    <ci> c </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_functions() {
    let node = node!(func!(Log), MathNode::implicit_integer(10), ci!(x));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <log/>
    <ci> x </ci>
  </apply>"
        ),
    );

    let node = node!(func!(Root), int!(3), ci!(x));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <root/>
    <degree>
      <cn type=\"integer\"> 3 </cn>
    </degree>
    <ci> x </ci>
  </apply>"
        ),
    );

    let node = MathNode::call("f", vec![ci!(x)]);
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <ci> f </ci>
    <ci> x </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_csymbols() {
    let node = MathNode { name: Some("t".to_string()), ..MathNode::new(NodeKind::Name(NameKind::Time)) };
    assert_eq!(
        write_mathml_to_string(&node),
        written!("  <csymbol encoding=\"text\" definitionURL=\"http://www.sbml.org/sbml/symbols/time\"> t </csymbol>"),
    );

    let node = MathNode { name: Some("rateOf".to_string()), ..node!(func!(RateOf), ci!(x)) };
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <csymbol encoding=\"text\" definitionURL=\"http://www.sbml.org/sbml/symbols/rateOf\"> rateOf </csymbol>
    <ci> x </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_constants_and_extended_functions() {
    let node = node!(func!(Max), MathNode::new(NodeKind::Constant(Constant::Pi)), ci!(x));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <max/>
    <pi/>
    <ci> x </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_lambda() {
    let node = node!(NodeKind::Lambda, ci!(x).as_bvar(), node!(op!(^), ci!(x), int!(2)));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <lambda>
    <bvar>
      <ci> x </ci>
    </bvar>
    <apply>
      <power/>
      <ci> x </ci>
      <cn type=\"integer\"> 2 </cn>
    </apply>
  </lambda>"
        ),
    );

    assert_eq!(write_mathml_to_string(&MathNode::new(NodeKind::Lambda)), written!("  <lambda/>"));
}

#[test]
fn test_piecewise() {
    let node = node!(NodeKind::Piecewise, int!(0), MathNode::new(NodeKind::Constant(Constant::True)), ci!(x));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <piecewise>
    <piece>
      <cn type=\"integer\"> 0 </cn>
      <true/>
    </piece>
    <otherwise>
      <ci> x </ci>
    </otherwise>
  </piecewise>"
        ),
    );
}

#[test]
fn test_semantics() {
    let mut node = ci!(a);
    node.semantics = true;
    node.definition_url = Some("urn:example:meaning".to_string());
    node.annotations = vec!["<annotation encoding=\"text\">note</annotation>".to_string()];

    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <semantics definitionURL=\"urn:example:meaning\">
    <ci definitionURL=\"urn:example:meaning\"> a </ci>
    <annotation encoding=\"text\">note</annotation>
  </semantics>"
        ),
    );
}

#[test]
fn test_unknown_omits_operator() {
    let node = node!(NodeKind::Unknown, ci!(a));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <ci> a </ci>
  </apply>"
        ),
    );
}

#[test]
fn test_escaping() {
    let node = MathNode::identifier("a<b");
    assert_eq!(write_mathml_to_string(&node), written!("  <ci> a&lt;b </ci>"));
}

#[test]
fn test_rationals_are_never_sentinels() {
    let node = MathNode::number(Number::Rational(0, 0));
    assert_eq!(
        write_mathml_to_string(&node),
        written!("  <cn type=\"rational\"> 0 <sep/> 0 </cn>"),
    );

    let node = MathNode::number(Number::Rational(1, 0));
    assert_eq!(
        write_mathml_to_string(&node),
        written!("  <cn type=\"rational\"> 1 <sep/> 0 </cn>"),
    );
}

#[test]
fn test_e_notation_exponent_overflow() {
    // Folding the mantissa's own exponent would go below i64::MIN
    let node = MathNode::number(Number::ENotation(1e-20, i64::MIN));
    assert_eq!(
        write_mathml_to_string(&node),
        written!("  <cn type=\"e-notation\"> 0.00000000000000000001 <sep/> -9223372036854775808 </cn>"),
    );
}

#[test]
fn test_n_ary_chain_stops_at_attributes() {
    let inner = node!(op!(+), ci!(a), ci!(b)).with_id("inner");
    let node = node!(op!(+), node!(op!(+), inner, ci!(c)), ci!(d));
    assert_eq!(
        write_mathml_to_string(&node),
        written!(
"  <apply>
    <plus/>
    <apply>
      <plus id=\"inner\"/>
      <ci> a </ci>
      <ci> b </ci>
    </apply>
    <ci> c </ci>
    <ci> d </ci>
  </apply>"
        ),
    );
}
