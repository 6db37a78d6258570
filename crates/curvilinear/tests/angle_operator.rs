//! Integration tests for the curvilinear angle operator

use sntools_curvilinear::{AngleOperator, Error};
use sntools_quadrature::{Geometry, Quadrature};
use sntools_utils::SoftEquiv;

use rstest::{fixture, rstest};

/// Route the library logs to stderr, ignoring repeat initialisation
fn init_logging() {
    let _ = stderrlog::new().verbosity(4).init();
}

#[fixture]
fn axisymmetric_ls2() -> AngleOperator {
    let quadrature = Quadrature::level_symmetric(2, 2, None).unwrap();
    AngleOperator::new(&quadrature, Geometry::Axisymmetric, 2).unwrap()
}

#[fixture]
fn spherical_gl2() -> AngleOperator {
    let quadrature = Quadrature::gauss_legendre(2, None).unwrap();
    AngleOperator::new(&quadrature, Geometry::Spherical, 1).unwrap()
}

#[rstest]
fn axisymmetric_ls2_levels(axisymmetric_ls2: AngleOperator) {
    let operator = axisymmetric_ls2;
    assert_eq!(operator.number_of_ordinates(), 6);
    assert_eq!(operator.number_of_levels(), 2);
    assert_eq!(operator.levels(), &[0, 0, 0, 1, 1, 1]);

    let dependent: Vec<bool> = (0..6).map(|m| operator.is_dependent(m).unwrap()).collect();
    assert_eq!(dependent, vec![false, true, true, false, true, true]);

    let total: f64 = operator.weights().iter().sum();
    assert!(total.soft_equiv(&1.0, 1e-14));
    assert_eq!(operator.weights()[0], 0.0);
    assert_eq!(operator.weights()[3], 0.0);
}

#[rstest]
fn axisymmetric_ls2_coefficients(axisymmetric_ls2: AngleOperator) {
    let operator = axisymmetric_ls2;

    let alpha = operator.alpha();
    assert_eq!(alpha[0], 0.0);
    assert!(alpha[1].soft_equiv(&-0.144337567297406, 1e-12));
    assert!(alpha[2].abs() < 1e-15);
    assert!(alpha[4].soft_equiv(&-0.144337567297406, 1e-12));
    assert!(alpha[5].abs() < 1e-15);

    let tau = operator.tau();
    assert_eq!(tau[0], 1.0);
    assert!(tau[1].soft_equiv(&0.292893218813452, 1e-12));
    assert!(tau[2].soft_equiv(&0.707106781186547, 1e-12));

    let psi = operator.psi_coefficient(1).unwrap();
    assert!(psi.soft_equiv(&-1.9711971193069772745, 1e-12));
    assert!(operator.psi_coefficient(2).unwrap().abs() < 1e-13);

    let source = operator.source_coefficient(1).unwrap();
    assert!(source.soft_equiv(&-1.3938468501173515435, 1e-12));
    let source = operator.source_coefficient(2).unwrap();
    assert!(source.soft_equiv(&-0.57735026918962573106, 1e-12));

    let bookkeeping = operator.bookkeeping_coefficient(1).unwrap();
    assert!(bookkeeping.soft_equiv(&3.4142135623730949234, 1e-12));
    let bookkeeping = operator.bookkeeping_coefficient(2).unwrap();
    assert!(bookkeeping.soft_equiv(&1.4142135623730951455, 1e-12));
}

#[rstest]
fn axisymmetric_ls2_projection(axisymmetric_ls2: AngleOperator) {
    let start = axisymmetric_ls2.projected_ordinate(0).unwrap();
    let expected = [-(2.0_f64 / 3.0).sqrt(), -1.0 / 3.0_f64.sqrt()];
    assert!(start.soft_equiv(&expected[..], 1e-14));
    assert!(axisymmetric_ls2.projected_ordinate(6).is_err());
}

#[rstest]
fn spherical_gl2_coefficients(spherical_gl2: AngleOperator) {
    let operator = spherical_gl2;
    assert_eq!(operator.number_of_levels(), 1);
    assert_eq!(operator.levels(), &[0, 0, 0]);

    let alpha = operator.alpha();
    assert_eq!(alpha[0], 0.0);
    assert!(alpha[1].soft_equiv(&-0.577350269189626, 1e-12));
    assert!(alpha[2].abs() < 1e-15);

    let expected_tau = [1.0, 0.42264973081037443547, 0.57735026918962639719];
    assert!(operator.tau().soft_equiv(&expected_tau[..], 1e-12));

    let psi = operator.psi_coefficient(1).unwrap();
    assert!(psi.soft_equiv(&-2.7320508075688758609, 1e-12));

    let source = operator.source_coefficient(1).unwrap();
    assert!(source.soft_equiv(&-1.5773502691896243988, 1e-12));
    let source = operator.source_coefficient(2).unwrap();
    assert!(source.soft_equiv(&-1.1547005383792516842, 1e-12));

    let bookkeeping = operator.bookkeeping_coefficient(1).unwrap();
    assert!(bookkeeping.soft_equiv(&2.3660254037844374864, 1e-12));
    let bookkeeping = operator.bookkeeping_coefficient(2).unwrap();
    assert!(bookkeeping.soft_equiv(&1.7320508075688754168, 1e-12));

    assert_eq!(operator.projected_ordinate(0).unwrap(), vec![-1.0]);
}

#[rstest]
fn starting_directions_are_not_dependent(spherical_gl2: AngleOperator) {
    assert!(matches!(
        spherical_gl2.source_coefficient(0),
        Err(Error::NotDependent { index: 0 })
    ));
    assert!(!spherical_gl2.is_dependent(0).unwrap());
    assert!(matches!(
        spherical_gl2.is_dependent(10),
        Err(Error::IndexOutOfRange { index: 10, length: 3 })
    ));
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(8)]
#[case(12)]
fn level_symmetric_closes_in_axisymmetric_geometry(#[case] order: usize) {
    init_logging();
    let quadrature = Quadrature::level_symmetric(order, 2, None).unwrap();
    let mut diagnostics = Vec::new();
    assert!(AngleOperator::is_compatible(
        &quadrature,
        Geometry::Axisymmetric,
        2,
        &mut diagnostics
    ));
    assert!(diagnostics.is_empty());

    let operator = AngleOperator::new(&quadrature, Geometry::Axisymmetric, 2).unwrap();
    assert_eq!(operator.number_of_levels(), order);
    assert_eq!(
        operator.number_of_ordinates(),
        quadrature.num_angles() + order
    );
    assert!(operator.tau().iter().all(|t| *t > 0.0 && *t <= 1.0));
}

#[rstest]
#[case(Quadrature::gauss_legendre(8, None).unwrap())]
#[case(Quadrature::double_gauss(8, None).unwrap())]
#[case(Quadrature::level_symmetric(6, 2, None).unwrap())]
#[case(Quadrature::level_symmetric(6, 3, None).unwrap())]
fn spherical_on_a_1d_mesh(#[case] quadrature: Quadrature) {
    let mut diagnostics = Vec::new();
    assert!(AngleOperator::is_compatible(
        &quadrature,
        Geometry::Spherical,
        1,
        &mut diagnostics
    ));

    let operator = AngleOperator::new(&quadrature, Geometry::Spherical, 1).unwrap();
    assert_eq!(operator.number_of_levels(), 1);
    assert!(operator.ordinates()[0].is_starting_direction());
    assert!(operator.tau()[1..].iter().all(|t| *t > 0.0 && *t < 1.0));
    assert!(operator.projected_ordinate(1).unwrap().len() == 1);
}

#[rstest]
#[case(Quadrature::level_symmetric(4, 2, None).unwrap(), Geometry::Spherical, 2)]
#[case(Quadrature::gauss_legendre(4, None).unwrap(), Geometry::Axisymmetric, 1)]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap(), Geometry::Axisymmetric, 3)]
fn incompatible_combinations(#[case] quadrature: Quadrature, #[case] geometry: Geometry, #[case] dimension: usize) {
    init_logging();
    let mut diagnostics = Vec::new();
    assert!(!AngleOperator::is_compatible(
        &quadrature,
        geometry,
        dimension,
        &mut diagnostics
    ));

    let text = String::from_utf8(diagnostics).unwrap();
    assert!(text.contains(quadrature.name()));
    assert!(AngleOperator::new(&quadrature, geometry, dimension).is_err());
}

#[test]
fn three_dimensional_set_on_an_axisymmetric_mesh() {
    let quadrature = Quadrature::level_symmetric(4, 3, None).unwrap();
    let operator = AngleOperator::new(&quadrature, Geometry::Axisymmetric, 2).unwrap();

    // upper hemisphere of 12 directions plus one start per level
    assert_eq!(operator.number_of_levels(), 4);
    assert_eq!(operator.number_of_ordinates(), 16);
    assert_eq!(operator.projected_ordinate(5).unwrap().len(), 2);

    let total: f64 = operator.weights().iter().sum();
    assert!(total.soft_equiv(&1.0, 1e-14));
}
