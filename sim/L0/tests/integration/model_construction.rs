//! Chain configuration → Model.
//!
//! Topology and parameter errors must surface from construction, before any
//! simulation step.

use chain_core::{JointType, Model};
use chain_types::{
    BodyConfig, ChainConfig, CoordinateConfig, CoordinateLimitConfig, GROUND, JointConfig,
    MassProperties, PrescribedForceConfig, RunConfig, SimError,
};
use nalgebra::Vector3;

fn block(name: &str) -> BodyConfig {
    BodyConfig::new(name, MassProperties::with_principal_inertia(1.0, 0.01, 0.01, 0.01))
}

fn pin(name: &str, parent: &str, child: &str, coordinate: &str) -> JointConfig {
    JointConfig::pin(name, parent, child, CoordinateConfig::new(coordinate))
}

// ============================================================================
// Reference chain
// ============================================================================

#[test]
fn test_reference_topology() {
    let model = Model::ankle_reference().unwrap();

    assert_eq!(model.nbody, 4);
    assert_eq!(model.njnt, 3);
    assert_eq!(model.nq, 2);
    assert_eq!(model.body_name, vec!["ground", "tibia", "talus", "calcaneus"]);
    assert_eq!(model.jnt_name, vec!["tibia_ground", "TT", "ST"]);
    assert_eq!(
        model.jnt_type,
        vec![JointType::Weld, JointType::Pin, JointType::Pin]
    );
    assert_eq!(model.coord_name, vec!["tt_pfdf", "st_inv_ev"]);
    assert_eq!(model.coord_parent, vec![None, Some(0)]);

    let calcaneus = model.body_id("calcaneus").unwrap();
    let supporting: Vec<usize> = model.supporting_coordinates(calcaneus).collect();
    assert_eq!(supporting, vec![1, 0]);
    assert!(model.is_ancestor(model.body_id("tibia").unwrap(), calcaneus));
}

#[test]
fn test_reference_initial_state() {
    let model = Model::ankle_reference().unwrap();
    let state = model.make_state();
    assert_eq!(state.time, 0.0);
    approx::assert_relative_eq!(state.qpos[0], (-5f64).to_radians());
    approx::assert_relative_eq!(state.qpos[1], (-2f64).to_radians());
    assert_eq!(state.qvel.iter().copied().sum::<f64>(), 0.0);
}

#[test]
fn test_lookup_by_name() {
    let model = Model::ankle_reference().unwrap();
    assert_eq!(model.coordinate_id("st_inv_ev").unwrap(), 1);
    assert_eq!(model.joint_id("TT").unwrap(), 1);
    assert!(matches!(
        model.coordinate_id("knee_angle"),
        Err(SimError::CoordinateNotFound { .. })
    ));
}

// ============================================================================
// Topology errors
// ============================================================================

#[test]
fn test_cycle_rejected() {
    let config = ChainConfig::new("loop")
        .body(block("a"))
        .body(block("b"))
        .joint(pin("ab", "a", "b", "q0"))
        .joint(pin("ba", "b", "a", "q1"));
    let err = Model::from_config(&config).unwrap_err();
    assert!(err.is_config_error(), "{err}");
}

#[test]
fn test_duplicate_child_rejected() {
    let config = ChainConfig::new("twice")
        .body(block("a"))
        .joint(pin("first", GROUND, "a", "q0"))
        .joint(JointConfig::weld("second", GROUND, "a"));
    let err = Model::from_config(&config).unwrap_err();
    assert!(matches!(err, SimError::DuplicateChild { .. }), "{err}");
}

#[test]
fn test_dangling_reference_rejected() {
    let config = ChainConfig::new("dangling")
        .body(block("a"))
        .joint(pin("hinge", "missing", "a", "q0"));
    let err = Model::from_config(&config).unwrap_err();
    assert!(matches!(err, SimError::BodyNotFound { .. }), "{err}");
}

#[test]
fn test_force_on_unknown_coordinate_rejected() {
    let config = ChainConfig::new("bad_limit")
        .body(block("a"))
        .joint(pin("hinge", GROUND, "a", "q0"))
        .force(CoordinateLimitConfig::new("q9", 0.5, 100.0, -0.5, 100.0, 1.0, 0.05));
    assert!(Model::from_config(&config).unwrap_err().is_config_error());
}

#[test]
fn test_force_on_unknown_body_rejected() {
    let config = ChainConfig::new("bad_load")
        .body(block("a"))
        .joint(pin("hinge", GROUND, "a", "q0"))
        .force(PrescribedForceConfig::new("push", "nowhere"));
    assert!(Model::from_config(&config).unwrap_err().is_config_error());
}

// ============================================================================
// Parameter errors
// ============================================================================

#[test]
fn test_non_positive_mass_rejected() {
    let config = ChainConfig::new("massless")
        .body(BodyConfig::new("a", MassProperties::point_mass(0.0)))
        .joint(pin("hinge", GROUND, "a", "q0"));
    assert!(Model::from_config(&config).unwrap_err().is_config_error());
}

#[test]
fn test_non_positive_stiffness_rejected() {
    let config = ChainConfig::new("soft")
        .body(block("a"))
        .joint(pin("hinge", GROUND, "a", "q0"))
        .force(CoordinateLimitConfig::new("q0", 0.5, 0.0, -0.5, 100.0, 1.0, 0.05));
    assert!(Model::from_config(&config).unwrap_err().is_config_error());
}

#[test]
fn test_zero_axis_rejected() {
    let config = ChainConfig::new("no_axis")
        .body(block("a"))
        .joint(pin("hinge", GROUND, "a", "q0").with_axis(Vector3::zeros()));
    assert!(Model::from_config(&config).unwrap_err().is_config_error());
}

#[test]
fn test_non_positive_run_settings_rejected() {
    assert!(RunConfig::new(0.0).validate().unwrap_err().is_config_error());
    assert!(
        RunConfig::new(0.2)
            .tolerance(-1e-6)
            .validate()
            .unwrap_err()
            .is_config_error()
    );
}

// ============================================================================
// Tree shapes
// ============================================================================

#[test]
fn test_branching_tree() {
    // Two pins hanging off the same body do not support each other.
    let config = ChainConfig::new("fork")
        .body(block("root"))
        .body(block("left"))
        .body(block("right"))
        .joint(pin("base", GROUND, "root", "q_root"))
        .joint(pin("l", "root", "left", "q_left"))
        .joint(pin("r", "root", "right", "q_right"));
    let model = Model::from_config(&config).unwrap();
    assert_eq!(model.nq, 3);

    let left = model.body_id("left").unwrap();
    let right = model.body_id("right").unwrap();
    assert!(!model.is_ancestor(left, right));
    let q_left = model.coordinate_id("q_left").unwrap();
    let q_right = model.coordinate_id("q_right").unwrap();
    let q_root = model.coordinate_id("q_root").unwrap();
    assert_eq!(model.coord_parent[q_left], Some(q_root));
    assert_eq!(model.coord_parent[q_right], Some(q_root));

    let qm = model.mass_matrix(&model.make_state()).unwrap();
    assert_eq!(qm[(q_left, q_right)], 0.0);
}

#[test]
fn test_declaration_order_does_not_matter() {
    // Joints declared child-first still produce parent-before-child bodies.
    let config = ChainConfig::new("reversed")
        .body(block("tip"))
        .body(block("base"))
        .joint(pin("upper", "base", "tip", "q1"))
        .joint(pin("lower", GROUND, "base", "q0"));
    let model = Model::from_config(&config).unwrap();
    let base = model.body_id("base").unwrap();
    let tip = model.body_id("tip").unwrap();
    assert!(base < tip);
    assert_eq!(model.body_parent[tip], base);
}
