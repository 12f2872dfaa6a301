mod common;

use approx::assert_relative_eq;
use common::ToyBackend;
use nlpmodels::check::gradient_check;
use nlpmodels::{
    ExternalModel, FeasibilityConfig, FeasibilityModel, Loss, Model, ModelError, EUCLID_ZERO_TOL,
};

type ToyFeas = FeasibilityModel<ExternalModel<ToyBackend>>;

fn toy_feas(config: FeasibilityConfig) -> ToyFeas {
    FeasibilityModel::new(ExternalModel::new(ToyBackend::new()).unwrap(), config).unwrap()
}

fn with_loss(loss: Loss) -> ToyFeas {
    toy_feas(FeasibilityConfig {
        loss,
        ..Default::default()
    })
}

// At x = [1, 2, 3]: c = [6, 2], P_S(c) = [1, 0.25], r = [5, 1.75].
const X_FAR: [f64; 3] = [1.0, 2.0, 3.0];
// Residual r ≈ [0.5, 0.05], strictly infeasible in both rows.
const X_NEAR: [f64; 3] = [0.6, 0.5, 0.4];
// Feasible: c = [0.3, 0.01].
const X_FEAS: [f64; 3] = [0.1, 0.1, 0.1];

#[test]
fn default_is_half_squared_residual() {
    let mut m = toy_feas(FeasibilityConfig::default());
    assert_eq!(m.loss(), Loss::EuclidSq);
    assert!(!m.with_prox());
    assert!(!m.with_indicator());
    assert_eq!(m.meta().name(), "toy-feas");
    assert!(m.is_unconstrained());

    assert_relative_eq!(m.obj(&X_FAR).unwrap(), 0.5 * (25.0 + 1.75 * 1.75));
    assert_eq!(m.residual(), &[5.0, 1.75]);
    assert_eq!(m.cviolation(&X_FAR).unwrap(), 5.0);
    assert_relative_eq!(m.infeasibility(&X_FAR).unwrap(), 14.03125);

    // ∇ = Jᵗ r with J = [[1, 1, 1], [x1, x0, 0]]
    assert_eq!(m.grad_vec(&X_FAR).unwrap(), vec![8.5, 6.75, 5.0]);
}

#[test]
fn each_loss_value() {
    let nr = (25.0_f64 + 1.75 * 1.75).sqrt();
    assert_relative_eq!(with_loss(Loss::Abs).obj(&X_FAR).unwrap(), 6.75);
    assert_relative_eq!(with_loss(Loss::Euclid).obj(&X_FAR).unwrap(), nr, max_relative = 1e-14);

    let mut huber = toy_feas(FeasibilityConfig {
        loss: Loss::Huber,
        huber_rho: 1.0,
        huber_mu: 2.0,
        ..Default::default()
    });
    // linear regime
    assert_relative_eq!(huber.obj(&X_FAR).unwrap(), 2.0 * (nr - 0.5), max_relative = 1e-14);
    // quadratic regime: r = [0.5, 0] at x0 = [0.5; 3]
    assert_relative_eq!(huber.obj(&[0.5, 0.5, 0.5]).unwrap(), 0.5 * 2.0 * 0.25);
}

#[test]
fn every_loss_has_consistent_gradient() {
    let configs = [
        FeasibilityConfig { loss: Loss::Abs, ..Default::default() },
        FeasibilityConfig { loss: Loss::Euclid, ..Default::default() },
        FeasibilityConfig { loss: Loss::EuclidSq, ..Default::default() },
        FeasibilityConfig { loss: Loss::Huber, huber_rho: 1.0, huber_mu: 3.0, ..Default::default() },
        FeasibilityConfig { loss: Loss::Huber, huber_rho: 0.1, huber_mu: 3.0, ..Default::default() },
    ];
    for config in configs {
        let loss = config.loss;
        let mut m = toy_feas(config);
        let bad = gradient_check(&mut m, &X_NEAR, 1e-7, 1e-5).unwrap();
        assert!(bad.is_empty(), "{loss}: {bad:?}");
    }
}

#[test]
fn feasible_point_has_zero_value_and_gradient() {
    for loss in [Loss::Abs, Loss::Euclid, Loss::EuclidSq, Loss::Huber] {
        let mut m = with_loss(loss);
        let (f, g) = m.objgrad_vec(&X_FEAS).unwrap();
        assert_eq!(f, 0.0, "{loss}");
        assert_eq!(g, vec![0.0; 3], "{loss}");
        assert_eq!(m.cviolation(&X_FEAS).unwrap(), 0.0);
    }
}

/// Toy problem with `S = {0} × ℝ`, so `r = [x0 + x1 + x2, 0]` and `∇ = dir₀·[1, 1, 1]`.
fn first_row_equality(config: FeasibilityConfig) -> ToyFeas {
    let backend =
        ToyBackend::with_con_bounds(vec![0.0, f64::NEG_INFINITY], vec![0.0, f64::INFINITY]);
    FeasibilityModel::new(ExternalModel::new(backend).unwrap(), config).unwrap()
}

#[test]
fn euclid_and_huber_stay_finite_for_huge_residuals() {
    let x = [1e160, 0.0, 0.0];

    let mut euclid = first_row_equality(FeasibilityConfig {
        loss: Loss::Euclid,
        ..Default::default()
    });
    let (f, g) = euclid.objgrad_vec(&x).unwrap();
    assert_eq!(f, 1e160);
    assert_eq!(g, vec![1.0; 3]);

    let (rho, mu) = (2.0, 3.0);
    let mut huber = first_row_equality(FeasibilityConfig {
        loss: Loss::Huber,
        huber_rho: rho,
        huber_mu: mu,
        ..Default::default()
    });
    let (f, g) = huber.objgrad_vec(&x).unwrap();
    assert_relative_eq!(f, rho * mu * (1e160 - 0.5 * rho), max_relative = 1e-15);
    assert_eq!(g, vec![rho * mu; 3]);
}

#[test]
fn euclid_direction_vanishes_up_to_zero_tolerance() {
    let mut m = first_row_equality(FeasibilityConfig {
        loss: Loss::Euclid,
        ..Default::default()
    });

    for r0 in [EUCLID_ZERO_TOL, 1e-160, 4.9e-324] {
        let (f, g) = m.objgrad_vec(&[r0, 0.0, 0.0]).unwrap();
        assert_eq!(f, r0, "value at {r0:e}");
        assert_eq!(g, vec![0.0; 3], "gradient at {r0:e}");
    }

    // Just above the threshold the direction is the unit residual.
    for r0 in [EUCLID_ZERO_TOL * 1.5, 1e-150, -1e-150] {
        let (f, g) = m.objgrad_vec(&[r0, 0.0, 0.0]).unwrap();
        assert_eq!(f, r0.abs(), "value at {r0:e}");
        assert_eq!(g, vec![r0.signum(); 3], "gradient at {r0:e}");
    }
}

#[test]
fn huber_is_quadratic_for_tiny_residuals() {
    let mut m = first_row_equality(FeasibilityConfig {
        loss: Loss::Huber,
        huber_mu: 2.0,
        ..Default::default()
    });
    let (f, g) = m.objgrad_vec(&[1e-160, 0.0, 0.0]).unwrap();
    assert_eq!(f, 0.0);
    assert_eq!(g, vec![2e-160; 3]);
}

#[test]
fn proximal_term_is_added() {
    let mut m = toy_feas(FeasibilityConfig {
        wprox: 2.0,
        dprox: Some(vec![1.0, 2.0, 3.0]),
        xprox: Some(vec![0.0; 3]),
        ..Default::default()
    });
    assert!(m.with_prox());
    assert_relative_eq!(m.proxdist(&X_FEAS).unwrap(), 0.03, max_relative = 1e-14);
    assert_relative_eq!(m.scaled_proxdist(&X_FEAS).unwrap(), 0.06, max_relative = 1e-14);
    assert_relative_eq!(m.obj(&X_FEAS).unwrap(), 0.06, max_relative = 1e-14);
    // the feasibility measure itself excludes it
    assert_eq!(m.infeasibility(&X_FEAS).unwrap(), 0.0);

    let g = m.grad_vec(&X_FEAS).unwrap();
    assert_relative_eq!(g[0], 0.2, max_relative = 1e-14);
    assert_relative_eq!(g[1], 0.4, max_relative = 1e-14);
    assert_relative_eq!(g[2], 0.6, max_relative = 1e-14);

    let bad = gradient_check(&mut m, &X_NEAR, 1e-7, 1e-5).unwrap();
    assert!(bad.is_empty(), "{bad:?}");
}

#[test]
fn prox_term_defaults_and_activation() {
    // reference point defaults to the base x0, scaling to ones
    let m = toy_feas(FeasibilityConfig {
        wprox: 1.0,
        ..Default::default()
    });
    assert!(m.with_prox());
    assert_eq!(m.proxdist(&[0.5, 0.5, 0.5]).unwrap(), 0.0);
    assert_relative_eq!(m.proxdist(&[1.5, 0.5, 0.5]).unwrap(), 0.5);

    // a zero scaling entry disables the term
    let mut m = toy_feas(FeasibilityConfig {
        wprox: 1.0,
        dprox: Some(vec![1.0, 0.0, 1.0]),
        ..Default::default()
    });
    assert!(!m.with_prox());
    assert_eq!(m.obj(&[5.0, -5.0, 0.0]).unwrap(), m.infeasibility(&[5.0, -5.0, 0.0]).unwrap());

    m.update_prox(&[0.0; 3], &[1.0; 3], 0.5).unwrap();
    assert!(m.with_prox());
    m.update_prox(&[0.0; 3], &[1.0; 3], 0.0).unwrap();
    assert!(!m.with_prox());
}

#[test]
fn invalid_prox_parameters_are_rejected() {
    let mut m = toy_feas(FeasibilityConfig::default());
    assert!(matches!(
        m.update_prox(&[0.0; 3], &[1.0; 3], -1.0),
        Err(ModelError::InvalidConfig(_))
    ));
    assert!(matches!(
        m.update_prox(&[0.0; 3], &[1.0, -1.0, 1.0], 1.0),
        Err(ModelError::InvalidConfig(_))
    ));
    assert!(matches!(
        m.update_prox(&[0.0; 2], &[1.0; 3], 1.0),
        Err(ModelError::DimensionMismatch { .. })
    ));
    assert!(!m.with_prox());

    let base = ExternalModel::new(ToyBackend::new()).unwrap();
    let config = FeasibilityConfig {
        loss: Loss::Huber,
        huber_rho: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        FeasibilityModel::new(base, config),
        Err(ModelError::InvalidConfig(_))
    ));
}

#[test]
fn prox_depends_on_indicator_flag() {
    let mut plain = toy_feas(FeasibilityConfig::default());
    let (val, z) = plain.objprox_vec(&[2.0, -2.0, 0.5], 1.0).unwrap();
    assert_eq!(z, vec![2.0, -2.0, 0.5]);
    assert_eq!(val, 0.0);

    let mut boxed = toy_feas(FeasibilityConfig {
        with_indicator: true,
        ..Default::default()
    });
    assert!(boxed.with_indicator());
    assert_eq!(boxed.prox_vec(&[2.0, -2.0, 0.5], 1.0).unwrap(), vec![1.0, -1.0, 0.5]);
}

#[test]
fn residual_is_cached_per_point() {
    let mut m = toy_feas(FeasibilityConfig::default());
    m.obj(&X_NEAR).unwrap();
    m.grad_vec(&X_NEAR).unwrap();
    m.cviolation(&X_NEAR).unwrap();
    let c = *m.counters().unwrap();
    assert_eq!((c.cons, c.proj, c.jtprod), (1, 1, 1));

    m.obj(&X_FAR).unwrap();
    assert_eq!(m.counters().unwrap().cons, 2);

    // touching the base forces a fresh evaluation
    m.base_mut().counters_mut().reset();
    m.obj(&X_FAR).unwrap();
    assert_eq!(m.counters().unwrap().cons, 1);
}

#[test]
fn loss_names_parse() {
    for loss in [Loss::Abs, Loss::Euclid, Loss::EuclidSq, Loss::Huber] {
        assert_eq!(loss.to_string().parse::<Loss>().unwrap(), loss);
    }
    assert_eq!("euclid_sq".parse::<Loss>().unwrap(), Loss::default());
    let err = "l2".parse::<Loss>().unwrap_err();
    assert!(matches!(err, ModelError::InvalidConfig(ref msg) if msg.contains("\"l2\"")));
}
