mod common;

use approx::assert_relative_eq;
use common::{Rosenbrock, ToyBackend};
use nlpmodels::check::gradient_check;
use nlpmodels::{AdModel, ExternalModel, Model, ModelError, ProxModel};

fn toy_prox() -> ProxModel<ExternalModel<ToyBackend>> {
    let base = ExternalModel::new(ToyBackend::new()).unwrap();
    ProxModel::new(base, vec![1.0, 0.0, -1.0], 0.5).unwrap()
}

#[test]
fn objective_is_scaled_distance_to_anchor() {
    let mut m = toy_prox();
    assert_eq!(m.meta().name(), "toy-prox");
    assert_eq!((m.nvar(), m.ncon()), (3, 2));
    assert_eq!(m.obj(&[0.0, 0.0, 0.0]).unwrap(), 2.0);
    assert_eq!(m.grad_vec(&[0.0, 0.0, 0.0]).unwrap(), vec![-2.0, 0.0, 2.0]);
    assert_eq!(m.obj(&[1.0, 0.0, -1.0]).unwrap(), 0.0);
    // the base objective is never evaluated
    assert_eq!(m.counters().unwrap().obj, 0);
}

#[test]
fn constraints_and_operators_pass_through() {
    let mut m = toy_prox();
    let x = [0.5, 0.2, -0.3];
    let mut base = ExternalModel::new(ToyBackend::new()).unwrap();
    assert_eq!(m.cons_vec(&x).unwrap(), base.cons_vec(&x).unwrap());
    assert_eq!(
        m.jprod_vec(&x, &[1.0, 1.0, 0.0]).unwrap(),
        base.jprod_vec(&x, &[1.0, 1.0, 0.0]).unwrap()
    );
    assert_eq!(
        m.jtprod_vec(&x, &[2.0, -1.0]).unwrap(),
        base.jtprod_vec(&x, &[2.0, -1.0]).unwrap()
    );
    assert_eq!(m.proj_vec(&[2.0, 1.0]).unwrap(), vec![1.0, 0.25]);
    assert_eq!(m.prox_vec(&[2.0, -2.0, 0.5], 3.0).unwrap(), vec![1.0, -1.0, 0.5]);
}

#[test]
fn update_moves_anchor_and_step() {
    let mut m = toy_prox();
    m.update(&[0.0, 0.0, 0.0], 2.0).unwrap();
    assert_eq!(m.anchor(), &[0.0, 0.0, 0.0]);
    assert_eq!(m.step(), 2.0);
    assert_relative_eq!(m.obj(&[1.0, 1.0, 1.0]).unwrap(), 0.75);
    assert_eq!(m.grad_vec(&[1.0, 2.0, 3.0]).unwrap(), vec![0.5, 1.0, 1.5]);
}

#[test]
fn invalid_updates_leave_model_unchanged() {
    let mut m = toy_prox();
    assert!(matches!(m.update(&[0.0; 3], 0.0), Err(ModelError::InvalidConfig(_))));
    assert!(matches!(m.update(&[0.0; 3], f64::NAN), Err(ModelError::InvalidConfig(_))));
    assert!(matches!(
        m.update(&[0.0; 2], 1.0),
        Err(ModelError::DimensionMismatch { what: "proximal anchor", .. })
    ));
    assert_eq!(m.anchor(), &[1.0, 0.0, -1.0]);
    assert_eq!(m.step(), 0.5);

    let base = ExternalModel::new(ToyBackend::new()).unwrap();
    assert!(ProxModel::new(base, vec![0.0; 3], -1.0).is_err());
}

#[test]
fn gradient_is_consistent() {
    let base = AdModel::new(Rosenbrock, vec![0.0; 4]).unwrap();
    let mut m = ProxModel::new(base, vec![0.3, -0.2, 1.1, 0.0], 0.7).unwrap();
    let bad = gradient_check(&mut m, &[1.0, 2.0, -0.5, 0.25], 1e-6, 1e-7).unwrap();
    assert!(bad.is_empty(), "{bad:?}");
    assert!(m.is_unconstrained());
    // the base still has no prox
    assert!(m.prox_vec(&[0.0; 4], 1.0).is_err());
}
