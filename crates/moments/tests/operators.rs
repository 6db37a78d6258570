//! Integration tests for the moment operators

use sntools_moments::{
    compute_n2lk, Error, InterpolationModel, LkIndex, QuadServices,
};
use sntools_quadrature::harmonics::legendre;
use sntools_quadrature::{Ordinate, Quadrature};
use sntools_utils::SoftEquiv;

use rstest::rstest;

/// Route the library logs to stderr, ignoring repeat initialisation
fn init_logging() {
    let _ = stderrlog::new().verbosity(4).init();
}

fn services(quadrature: &Quadrature, model: InterpolationModel) -> QuadServices {
    QuadServices::new(quadrature, model, None).unwrap()
}

#[rstest]
#[case(Quadrature::gauss_legendre(2, None).unwrap())]
#[case(Quadrature::gauss_legendre(8, None).unwrap())]
#[case(Quadrature::double_gauss(8, None).unwrap())]
#[case(Quadrature::level_symmetric(2, 2, None).unwrap())]
#[case(Quadrature::level_symmetric(6, 2, None).unwrap())]
#[case(Quadrature::level_symmetric(2, 3, None).unwrap())]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap())]
#[case(Quadrature::level_symmetric(8, 3, None).unwrap())]
fn square_models_invert(
    #[case] quadrature: Quadrature,
    #[values(InterpolationModel::Sn, InterpolationModel::Galerkin)] model: InterpolationModel,
) {
    let services = services(&quadrature, model);
    assert_eq!(services.num_moments(), quadrature.num_angles());
    assert!(services.d_equals_m_inverse());
    assert!(services.d_0_equals_wt());

    // round trip of an arbitrary angular flux
    let psi: Vec<f64> = (0..services.num_angles()).map(|m| 1.0 + 0.1 * m as f64).collect();
    let phi = services.apply_d(&psi).unwrap();
    let back = services.apply_m(&phi).unwrap();
    for (a, b) in psi.iter().zip(&back) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }
}

#[rstest]
fn high_order_level_symmetric_keeps_d0(#[values(10, 12, 14, 16)] order: usize) {
    init_logging();
    let quadrature = Quadrature::level_symmetric(order, 3, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Sn);
    assert!(services.d_0_equals_wt());
}

#[rstest]
#[case(Quadrature::gauss_legendre(8, None).unwrap(), 8)]
#[case(Quadrature::level_symmetric(4, 2, None).unwrap(), 10)]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap(), 16)]
#[case(Quadrature::square_chebyshev_legendre(4, None).unwrap(), 10)]
fn svd_default_expansion(#[case] quadrature: Quadrature, #[case] moments: usize) {
    init_logging();
    let services = services(&quadrature, InterpolationModel::Svd);
    assert_eq!(services.num_moments(), moments);
    assert!(services.d_equals_m_inverse());
    assert!(services.d_0_equals_wt());
}

#[test]
fn svd_explicit_expansion_order() {
    let quadrature = Quadrature::level_symmetric(8, 3, None).unwrap();
    let services = QuadServices::new(&quadrature, InterpolationModel::Svd, Some(3)).unwrap();
    assert_eq!(services.num_moments(), 16);
    assert_eq!(services.lk_pair(15).unwrap(), LkIndex::new(3, 3));
    assert!(services.d_equals_m_inverse());

    assert!(matches!(
        QuadServices::new(&quadrature, InterpolationModel::Svd, Some(20)),
        Err(Error::TooManyMoments { .. })
    ));
}

#[test]
fn expansion_order_needs_svd() {
    let quadrature = Quadrature::gauss_legendre(4, None).unwrap();
    assert!(matches!(
        QuadServices::new(&quadrature, InterpolationModel::Sn, Some(2)),
        Err(Error::ExpansionOrderNotAllowed { .. })
    ));
}

#[test]
fn square_sets_reject_sn() {
    let quadrature = Quadrature::square_chebyshev_legendre(4, None).unwrap();
    assert!(matches!(
        QuadServices::new(&quadrature, InterpolationModel::Sn, None),
        Err(Error::UnsupportedModel { .. })
    ));
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(6)]
fn galerkin_spans_square_sets(#[case] order: usize) {
    let quadrature = Quadrature::square_chebyshev_legendre(order, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Galerkin);
    assert_eq!(services.num_moments(), quadrature.num_angles());
    assert_eq!(services.lk_pair(0).unwrap(), LkIndex::new(0, 0));
    assert!(services.n2lk().iter().all(|lk| lk.k >= 0));
    assert!(services.d_equals_m_inverse());
    assert!(services.d_0_equals_wt());
}

#[rstest]
#[case(Quadrature::gauss_legendre(8, None).unwrap())]
#[case(Quadrature::level_symmetric(2, 2, None).unwrap())]
#[case(Quadrature::level_symmetric(6, 2, None).unwrap())]
#[case(Quadrature::level_symmetric(2, 3, None).unwrap())]
#[case(Quadrature::level_symmetric(8, 3, None).unwrap())]
fn galerkin_moments_on_level_symmetric_sets(#[case] quadrature: Quadrature) {
    let sn = compute_n2lk(&quadrature, InterpolationModel::Sn, None).unwrap();
    let galerkin = compute_n2lk(&quadrature, InterpolationModel::Galerkin, None).unwrap();
    assert_eq!(galerkin, sn);
}

#[test]
fn empty_moment_list_rejected() {
    let quadrature = Quadrature::gauss_legendre(4, None).unwrap();
    for model in [InterpolationModel::Svd, InterpolationModel::Sn] {
        assert!(matches!(
            QuadServices::with_moments(&quadrature, model, vec![]),
            Err(Error::NoMoments)
        ));
    }
}

#[test]
fn gauss_legendre_s2_operators() {
    let quadrature = Quadrature::gauss_legendre(2, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Sn);
    let mu = quadrature.mu();

    for m in 0..2 {
        for n in 0..2 {
            let expected = (2 * n + 1) as f64 / 2.0 * legendre(n, mu[m]);
            assert!(services.m()[(m, n)].soft_equiv(&expected, 1e-14));
        }
    }

    let phi = services.apply_d(&[7.0, 7.0]).unwrap();
    assert!(phi[0].soft_equiv(&14.0, 1e-13));
    assert!(phi[1].abs() < 1e-13);

    let psi = services.apply_m(&[7.0, 0.0]).unwrap();
    assert!(psi.soft_equiv(&[3.5, 3.5][..], 1e-14));
}

#[test]
fn gauss_legendre_s8_operators() {
    let quadrature = Quadrature::gauss_legendre(8, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Sn);
    let mu = quadrature.mu();

    let n2lk: Vec<LkIndex> = (0..8).map(|n| LkIndex::new(n, 0)).collect();
    assert_eq!(services.n2lk(), n2lk.as_slice());

    for m in 0..8 {
        for n in 0..8 {
            let expected = (2 * n + 1) as f64 / 2.0 * legendre(n, mu[m]);
            assert!((services.m()[(m, n)] - expected).abs() < 1e-13);
        }
    }

    let phi = services.apply_d(&[7.0; 8]).unwrap();
    assert!(phi[0].soft_equiv(&14.0, 1e-12));
    assert!(phi[1..].iter().all(|p| p.abs() < 1e-11));

    let mut moments = vec![0.0; 8];
    moments[0] = 7.0;
    let psi = services.apply_m(&moments).unwrap();
    assert!(psi.iter().all(|p| p.soft_equiv(&3.5, 1e-13)));
}

#[test]
fn level_symmetric_s2_3d_moments() {
    let quadrature = Quadrature::level_symmetric(2, 3, None).unwrap();
    let n2lk = compute_n2lk(&quadrature, InterpolationModel::Sn, None).unwrap();
    let expected: Vec<LkIndex> = [(0, 0), (1, -1), (1, 0), (1, 1), (2, -2), (2, -1), (2, 1), (3, -2)]
        .into_iter()
        .map(LkIndex::from)
        .collect();
    assert_eq!(n2lk, expected);
}

#[rstest]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap(), InterpolationModel::Sn)]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap(), InterpolationModel::Galerkin)]
#[case(Quadrature::level_symmetric(4, 3, None).unwrap(), InterpolationModel::Svd)]
#[case(Quadrature::square_chebyshev_legendre(4, None).unwrap(), InterpolationModel::Galerkin)]
fn augment_reproduces_m(#[case] quadrature: Quadrature, #[case] model: InterpolationModel) {
    let services = services(&quadrature, model);
    for (m, ordinate) in quadrature.ordinates().iter().enumerate() {
        for n in 0..services.num_moments() {
            let value = services.augment_m(n, ordinate).unwrap();
            assert_eq!(value, services.m()[(m, n)]);
        }
    }
}

#[test]
fn augment_evaluates_starting_directions() {
    let quadrature = Quadrature::level_symmetric(4, 3, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Galerkin);

    // a starting direction is not part of the set but is still evaluated
    let start = Ordinate::new(-1.0, 0.0, 0.0, 0.0).unwrap();
    let value = services.augment_m(2, &start).unwrap();
    assert!(value.soft_equiv(&(-3.0 / (4.0 * std::f64::consts::PI)), 1e-14));
    assert!(services.augment_m(24, &start).is_err());
}

#[test]
fn explicit_moments() {
    let quadrature = Quadrature::gauss_legendre(4, None).unwrap();
    let n2lk = vec![LkIndex::new(0, 0), LkIndex::new(2, 0), LkIndex::new(1, 0), LkIndex::new(3, 0)];
    let services = QuadServices::with_moments(&quadrature, InterpolationModel::Sn, n2lk).unwrap();
    assert_eq!(services.lk_pair(1).unwrap(), LkIndex::new(2, 0));
    assert!(services.d_equals_m_inverse());
    assert!(services.d_0_equals_wt());

    let reordered = vec![LkIndex::new(1, 0), LkIndex::new(0, 0), LkIndex::new(2, 0), LkIndex::new(3, 0)];
    let services = QuadServices::with_moments(&quadrature, InterpolationModel::Sn, reordered).unwrap();
    assert!(!services.d_0_equals_wt());

    let short = vec![LkIndex::new(0, 0), LkIndex::new(1, 0)];
    assert!(matches!(
        QuadServices::with_moments(&quadrature, InterpolationModel::Galerkin, short),
        Err(Error::MomentCount { .. })
    ));
}

#[test]
fn shape_errors() {
    let quadrature = Quadrature::gauss_legendre(4, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Galerkin);
    assert!(matches!(
        services.apply_d(&[1.0; 3]),
        Err(Error::ShapeMismatch { expected: 4, found: 3, .. })
    ));
    assert!(services.apply_m(&[1.0; 5]).is_err());
    assert!(matches!(
        services.lk_pair(4),
        Err(Error::IndexOutOfRange { index: 4, length: 4 })
    ));
}

#[test]
fn azimuthal_angles_and_printing() {
    let quadrature = Quadrature::level_symmetric(2, 3, None).unwrap();
    let services = services(&quadrature, InterpolationModel::Sn);
    for m in 0..services.num_angles() {
        let phi = services.compute_azimuthal_angle(m).unwrap();
        assert!((0.0..2.0 * std::f64::consts::PI).contains(&phi));
    }
    assert!(services.compute_azimuthal_angle(8).is_err());

    let mut out = Vec::new();
    services.print_matrix(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("SN interpolation in 3D, 8 angles, 8 moments"));
    assert!(text.contains("M (8 x 8)"));
    assert!(text.contains("D (8 x 8)"));
}
