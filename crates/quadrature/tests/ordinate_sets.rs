//! Integration tests for ordinate sets and spherical harmonics

use sntools_quadrature::harmonics::{azimuthal_angle, galerkin_ylk};
use sntools_quadrature::{Error, Geometry, OrdinateSet, Quadrature};
use sntools_utils::SoftEquiv;

use rstest::{fixture, rstest};
use std::f64::consts::PI;

#[fixture]
fn ls2() -> Quadrature {
    Quadrature::level_symmetric(2, 2, None).unwrap()
}

#[fixture]
fn gl2() -> Quadrature {
    Quadrature::gauss_legendre(2, None).unwrap()
}

#[rstest]
fn cartesian_1d_keeps_quadrature_order(gl2: Quadrature) {
    let set = OrdinateSet::new(&gl2, Geometry::Cartesian, 1).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set[0].x(), gl2.mu()[0]);
    assert_eq!(set.num_weighted(), 2);
    assert_eq!(set.norm(), 2.0);
}

#[rstest]
fn spherical_1d_gets_one_start(gl2: Quadrature) {
    let set = OrdinateSet::new(&gl2, Geometry::Spherical, 1).unwrap();
    let x: Vec<f64> = set.iter().map(|o| o.x()).collect();
    assert_eq!(x.len(), 3);
    assert_eq!(x[0], -1.0);
    assert!(x[1].soft_equiv(&(-1.0 / 3.0_f64.sqrt()), 1e-14));
    assert!(set[0].is_starting_direction());
    assert_eq!(set.num_weighted(), 2);
}

#[rstest]
fn axisymmetric_1d_quadrature_rejected(gl2: Quadrature) {
    assert!(matches!(
        OrdinateSet::new(&gl2, Geometry::Axisymmetric, 1),
        Err(Error::IncompatibleGeometry { .. })
    ));
}

#[rstest]
fn axisymmetric_2d_starts_each_level(ls2: Quadrature) {
    let set = OrdinateSet::new(&ls2, Geometry::Axisymmetric, 2).unwrap();
    assert_eq!(set.len(), 6);

    let c = 1.0 / 3.0_f64.sqrt();
    for level in set.chunks(3) {
        assert!(level[0].is_starting_direction());
        assert!(level[0].x().soft_equiv(&-(2.0_f64 / 3.0).sqrt(), 1e-14));
        assert!(level[1].x().soft_equiv(&-c, 1e-14));
        assert!(level[2].x().soft_equiv(&c, 1e-14));
        assert!(level.iter().all(|o| o.z() == level[0].z()));
    }
    assert!(set[0].z() < set[3].z());
}

#[rstest]
fn spherical_2d_mesh_rejected(ls2: Quadrature) {
    assert!(OrdinateSet::new(&ls2, Geometry::Spherical, 2).is_err());
    assert!(OrdinateSet::new(&ls2, Geometry::Cartesian, 3).is_err());
}

#[test]
fn collapsed_2d_onto_1d_mesh() {
    let quadrature = Quadrature::level_symmetric(4, 2, None).unwrap();
    let set = OrdinateSet::new(&quadrature, Geometry::Cartesian, 1).unwrap();

    // four distinct mu cosines, weights summed over eta
    assert_eq!(set.len(), 4);
    assert!(set.windows(2).all(|pair| pair[0].x() < pair[1].x()));
    assert!(set.iter().all(|o| o.y() == 0.0 && o.z() == 0.0));
    let total: f64 = set.iter().map(|o| o.wt()).sum();
    assert!(total.soft_equiv(&(2.0 * PI), 1e-12));

    let spherical = OrdinateSet::new(&quadrature, Geometry::Spherical, 1).unwrap();
    assert_eq!(spherical.len(), 5);
    assert_eq!(spherical[0].x(), -1.0);
}

#[test]
fn axisymmetric_2d_onto_1d_mesh() {
    let quadrature = Quadrature::level_symmetric(4, 2, None).unwrap();
    let set = OrdinateSet::new(&quadrature, Geometry::Axisymmetric, 1).unwrap();

    // the two upper levels hold 2 and 4 directions plus a start each
    assert_eq!(set.len(), 8);
    assert!(set.iter().all(|o| o.z() > 0.0));
    let total: f64 = set.iter().map(|o| o.wt()).sum();
    assert!(total.soft_equiv(&(2.0 * PI), 1e-12));
}

#[test]
fn three_dimensional_onto_2d_mesh() {
    let quadrature = Quadrature::level_symmetric(4, 3, None).unwrap();
    let set = OrdinateSet::new(&quadrature, Geometry::Cartesian, 2).unwrap();
    assert_eq!(set.len(), 12);
    assert!(set.iter().all(|o| o.y() > 0.0));
    let total: f64 = set.iter().map(|o| o.wt()).sum();
    assert!(total.soft_equiv(&(4.0 * PI), 1e-12));

    let full = OrdinateSet::new(&quadrature, Geometry::Cartesian, 3).unwrap();
    assert_eq!(full.len(), 24);
    assert_eq!(full.ordinates(), quadrature.ordinates().as_slice());
}

#[rstest]
#[case(Quadrature::level_symmetric(4, 2, None).unwrap())]
#[case(Quadrature::square_chebyshev_legendre(4, None).unwrap())]
fn cartesian_keeps_quadrature_order(#[case] quadrature: Quadrature) {
    let set = OrdinateSet::new(&quadrature, Geometry::Cartesian, 2).unwrap();
    assert_eq!(set.ordinates(), quadrature.ordinates().as_slice());
    assert!(set.iter().all(|o| !o.is_starting_direction()));
}

#[test]
fn harmonics_agree_on_quadrature_directions() {
    let quadrature = Quadrature::level_symmetric(6, 3, None).unwrap();
    let sumwt = quadrature.norm();
    for ordinate in quadrature.ordinates() {
        let phi = azimuthal_angle(ordinate.y(), ordinate.z());
        for l in 0..6_usize {
            for k in -(l as i32)..=(l as i32) {
                let y = OrdinateSet::y(l, k, &ordinate, sumwt).unwrap();
                let reference = galerkin_ylk(l, k, ordinate.x(), phi, sumwt);
                assert!((y - reference).abs() < 1e-12, "Y({l},{k})");
            }
        }
    }
}

#[test]
fn harmonics_orthonormal_under_quadrature() {
    // S8 integrates products of degree up to 7 exactly
    let quadrature = Quadrature::level_symmetric(8, 3, None).unwrap();
    let sumwt = quadrature.norm();
    let lk = [(0, 0), (1, -1), (1, 0), (1, 1), (2, -2), (2, 1), (3, 2)];
    for (l1, k1) in lk {
        for (l2, k2) in lk {
            let integral: f64 = quadrature
                .ordinates()
                .iter()
                .map(|o| {
                    o.wt()
                        * OrdinateSet::y(l1, k1, o, sumwt).unwrap()
                        * OrdinateSet::y(l2, k2, o, sumwt).unwrap()
                })
                .sum();
            let expected = if (l1, k1) == (l2, k2) { 1.0 } else { 0.0 };
            assert!((integral - expected).abs() < 1e-8, "({l1},{k1}) x ({l2},{k2})");
        }
    }
}
