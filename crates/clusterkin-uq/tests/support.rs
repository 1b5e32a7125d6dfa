//! Posterior behaviour across the prior support.

use clusterkin_uq::{
    Basis, NoiseModel, Observation, PolynomialSurrogate, Posterior, Prior, OUT_OF_SUPPORT,
};
use proptest::prelude::*;

fn quadratic() -> Posterior<PolynomialSurrogate> {
    let model = PolynomialSurrogate::total_order(Basis::Hermite, 1, 2);
    let data = (0..9)
        .map(|i| {
            let x = -2.0 + 0.5 * i as f64;
            Observation::new([x], 0.5 + x + 0.25 * (x * x - 1.0))
        })
        .collect();
    Posterior::new(
        model,
        data,
        vec![Prior::Uniform { lower: -4.0, upper: 4.0 }; 3],
        NoiseModel::ConstStdev { sigma: 0.05 },
        vec![0, 1, 2],
        vec![0.0; 3],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn inside_support_is_prior_plus_likelihood(
        c0 in -3.9f64..3.9, c1 in -3.9f64..3.9, c2 in -3.9f64..3.9,
    ) {
        let post = quadratic();
        let m = [c0, c1, c2];
        let total = post.log_posterior(&m).unwrap();
        let parts = post.log_prior(&m).unwrap() + post.log_likelihood(&m).unwrap();
        prop_assert_eq!(total, parts);
        prop_assert!(total <= post.log_posterior(&[0.5, 1.0, 0.25]).unwrap());
    }

    #[test]
    fn outside_support_short_circuits(c0 in 4.0f64..100.0, c1 in -3.0f64..3.0) {
        let post = quadratic();
        prop_assert_eq!(post.log_posterior(&[c0, c1, 0.0]).unwrap(), OUT_OF_SUPPORT);
        prop_assert_eq!(post.log_posterior(&[c1, -c0, 0.0]).unwrap(), OUT_OF_SUPPORT);
    }
}
