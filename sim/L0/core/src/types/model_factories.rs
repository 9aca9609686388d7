//! Factory methods for common chains.
//!
//! These constructors produce pre-configured [`Model`] instances: the
//! three-segment ankle reference chain and serial pendulums. Used by inline
//! tests, by `chain-conformance-tests` and by the demo.

use nalgebra::{Isometry3, UnitQuaternion, Vector3};

use chain_types::{
    BodyConfig, ChainConfig, CoordinateConfig, CoordinateLimitConfig, FunctionSpec, GROUND,
    JointConfig, MassProperties, PointFrame, PrescribedForceConfig, Result, SimError,
};

use super::model::Model;

/// Body weight used to scale the reference forefoot load (N).
pub const REFERENCE_BODY_WEIGHT: f64 = 700.0;

/// Simulation horizon of the reference scenario (s).
pub const REFERENCE_END_TIME: f64 = 0.20;

/// Viscous damping on both reference pins (N·m·s/rad).
const REFERENCE_PIN_DAMPING: f64 = 1.0;

/// Configuration of the ankle reference chain.
///
/// ground --weld--> tibia --pin `tt_pfdf` (Z)--> talus --pin `st_inv_ev` (X)--> calcaneus
///
/// All joint centres coincide with the tibia origin. Both coordinates carry
/// a limit force (+30° / −20°, 1000 N·m/rad, damping 5, transition 0.05 rad)
/// and start at −5° and −2°. A vertical load with knots (0, 0),
/// (0.06, 2·BW), (0.20, 0.5·BW) acts at a forefoot point fixed on the
/// calcaneus. The point is placed so that the load lines up with the joint
/// centre at `tt_pfdf` = 10°, `st_inv_ev` = 8°, which is where the loaded
/// chain settles.
#[must_use]
pub fn ankle_reference_config() -> ChainConfig {
    let bw = REFERENCE_BODY_WEIGHT;

    let forefoot = UnitQuaternion::from_scaled_axis(Vector3::x() * (-8f64).to_radians())
        * UnitQuaternion::from_scaled_axis(Vector3::z() * (-10f64).to_radians())
        * Vector3::new(0.0, 0.05, 0.0);

    let limit = |coordinate: &str| {
        CoordinateLimitConfig::new(
            coordinate,
            30f64.to_radians(),
            1e3,
            (-20f64).to_radians(),
            1e3,
            5.0,
            0.05,
        )
    };

    ChainConfig::new("ankle_reference")
        .body(BodyConfig::new(
            "tibia",
            MassProperties::with_principal_inertia(3.0, 0.02, 0.02, 0.02),
        ))
        .body(BodyConfig::new(
            "talus",
            MassProperties::with_principal_inertia(0.2, 0.001, 0.001, 0.001),
        ))
        .body(BodyConfig::new(
            "calcaneus",
            MassProperties::with_principal_inertia(0.3, 0.002, 0.002, 0.002),
        ))
        .joint(JointConfig::weld("tibia_ground", GROUND, "tibia"))
        .joint(JointConfig::pin(
            "TT",
            "tibia",
            "talus",
            CoordinateConfig::new("tt_pfdf")
                .with_default_value((-5f64).to_radians())
                .with_damping(REFERENCE_PIN_DAMPING),
        ))
        .joint(
            JointConfig::pin(
                "ST",
                "talus",
                "calcaneus",
                CoordinateConfig::new("st_inv_ev")
                    .with_default_value((-2f64).to_radians())
                    .with_damping(REFERENCE_PIN_DAMPING),
            )
            .with_axis(Vector3::x()),
        )
        .force(limit("tt_pfdf"))
        .force(limit("st_inv_ev"))
        .force(
            PrescribedForceConfig::new("forefoot_load", "calcaneus")
                .at_point(forefoot, PointFrame::Body)
                .with_force(
                    FunctionSpec::zero(),
                    FunctionSpec::piecewise_linear(&[
                        (0.0, 0.0),
                        (0.06, 2.0 * bw),
                        (0.20, 0.5 * bw),
                    ]),
                    FunctionSpec::zero(),
                ),
        )
}

impl Model {
    /// The ankle reference chain, see [`ankle_reference_config`].
    pub fn ankle_reference() -> Result<Self> {
        Self::from_config(&ankle_reference_config())
    }

    /// Create an n-link serial pendulum (pins about Z).
    ///
    /// Each link is a point mass `link_mass` at distance `link_length` below
    /// its pin; the next pin sits at that mass. All coordinates start at 0
    /// (hanging straight down along −Y) under Earth gravity.
    ///
    /// # Errors
    ///
    /// `n` must be at least 1 and the mass and length positive.
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Result<Self> {
        if n == 0 {
            return Err(SimError::invalid_config(
                "n_link_pendulum requires at least 1 link",
            ));
        }
        if !(link_length > 0.0) {
            return Err(SimError::invalid_config(format!(
                "link length must be positive, got {link_length}"
            )));
        }

        let tip = Vector3::new(0.0, -link_length, 0.0);
        let mut config = ChainConfig::new(format!("{n}_link_pendulum"));
        for i in 0..n {
            let name = format!("link_{i}");
            let parent = if i == 0 {
                GROUND.to_string()
            } else {
                format!("link_{}", i - 1)
            };
            let parent_frame = if i == 0 {
                Isometry3::identity()
            } else {
                Isometry3::translation(tip.x, tip.y, tip.z)
            };
            config = config
                .body(BodyConfig::new(
                    name.as_str(),
                    MassProperties::point_mass(link_mass).with_center_of_mass(tip),
                ))
                .joint(
                    JointConfig::pin(
                        format!("hinge_{i}"),
                        parent,
                        name.as_str(),
                        CoordinateConfig::new(format!("q{i}")),
                    )
                    .with_parent_frame(parent_frame),
                );
        }
        Self::from_config(&config)
    }
}
