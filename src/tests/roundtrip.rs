use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{
    read_mathml_from_string, write_mathml_to_string, Logical, MathNode, NameKind, NodeKind, Number,
};

fn reread(node: &MathNode) -> MathNode {
    read_mathml_from_string(&write_mathml_to_string(node)).unwrap()
}

#[test]
fn test_trees_survive_writing() {
    let trees = vec![
        real!(0.125),
        int!(-7),
        MathNode::number(Number::Rational(3, 4)),
        MathNode::number(Number::ENotation(6.02, 23)),
        real!(f64::INFINITY),
        node!(op!(+), node!(op!(+), ci!(a), ci!(b)), ci!(c)),
        node!(op!(-), ci!(a)),
        node!(NodeKind::Logical(Logical::Or), ci!(p), ci!(q), ci!(r)),
        node!(func!(Log), MathNode::implicit_integer(10), ci!(x)),
        node!(func!(Log), int!(2), ci!(x)),
        node!(func!(Root), MathNode::implicit_integer(2), ci!(x)),
        node!(NodeKind::Lambda, ci!(x).as_bvar(), node!(op!(*), ci!(x), ci!(x))),
        node!(NodeKind::Piecewise, int!(1), ci!(p), int!(2)),
        MathNode::call("f", vec![ci!(x), int!(1)]),
        MathNode { name: Some("t".to_string()), ..MathNode::new(NodeKind::Name(NameKind::Time)) },
        node!(func!(Max), ci!(a), ci!(b)),
        int!(5).with_units("second"),
    ];

    for tree in trees {
        assert_eq!(reread(&tree), tree);
    }
}

#[test]
fn test_special_reals_survive_writing() {
    assert!(reread(&real!(f64::NAN)).number_value().unwrap().is_nan());

    // Negative infinity can only be written as an application of minus
    assert_eq!(reread(&real!(f64::NEG_INFINITY)), node!(op!(-), real!(f64::INFINITY)));
}

#[test]
fn test_semantics_survive_writing() {
    let mut tree = node!(func!(Sin), ci!(x));
    tree.semantics = true;
    tree.annotations = vec!["<annotation encoding=\"text\">angle in radians</annotation>".to_string()];

    assert_eq!(reread(&tree), tree);
}

#[rstest]
#[case(written!("  <cn> 12345.7 </cn>"))]
#[case(written!("  <cn type=\"rational\"> 12342 <sep/> 2342342 </cn>"))]
#[case(written!("  <cn type=\"e-notation\"> 12.3 <sep/> 5 </cn>"))]
#[case(written!(
"  <apply>
    <and/>
    <ci> a </ci>
    <ci> b </ci>
    <ci> c </ci>
  </apply>"
))]
#[case(written!(
"  <apply>
    <log/>
    <ci> x </ci>
  </apply>"
))]
#[case(written!(
"  <apply>
    <csymbol encoding=\"text\" definitionURL=\"http://www.sbml.org/sbml/symbols/delay\"> delay </csymbol>
    <ci> x </ci>
    <cn> 0.1 </cn>
  </apply>"
))]
#[case(written!(
"  <piecewise>
    <piece>
      <cn type=\"integer\"> 0 </cn>
      <apply>
        <lt/>
        <ci> x </ci>
        <cn type=\"integer\"> 0 </cn>
      </apply>
    </piece>
    <otherwise>
      <ci> x </ci>
    </otherwise>
  </piecewise>"
))]
#[case(written!(
"  <lambda>
    <bvar>
      <ci> x </ci>
    </bvar>
    <bvar>
      <ci> y </ci>
    </bvar>
  </lambda>"
))]
fn test_canonical_text_is_stable(#[case] text: &str) {
    let tree = read_mathml_from_string(text).unwrap();
    assert_eq!(write_mathml_to_string(&tree), text);
}

#[rstest]
#[case(mathml!("<cn type='rational'> 0 <sep/> 0 </cn>"))]
#[case(mathml!("<cn type='rational'> 1 <sep/> 0 </cn>"))]
#[case(mathml!("<cn type='e-notation'> 0.00000000000000000001 <sep/> -9223372036854775808 </cn>"))]
#[case(mathml!("<apply><plus/><apply id='inner'><plus/><ci> a </ci><ci> b </ci></apply><ci> c </ci></apply>"))]
#[case(mathml!("<apply><times/><apply class='c'><times/><ci> a </ci><ci> b </ci></apply><ci> c </ci></apply>"))]
fn test_read_trees_survive_writing(#[case] text: &str) {
    let tree = read_mathml_from_string(text).unwrap();
    assert_eq!(reread(&tree), tree);
}
