//! Model construction from a [`ChainConfig`].
//!
//! Resolves body and coordinate names, checks the joint graph (every body
//! has exactly one parent joint and is reachable from ground), orders bodies
//! so parents precede children, and flattens everything into the per-id
//! arrays of [`Model`].

use std::collections::HashMap;

use nalgebra::Vector3;
use tracing::debug;

use chain_types::{ChainConfig, ForceConfig, GROUND, JointKind, Result, SimError};

use super::model::{JointType, Model};
use crate::forces::{CoordinateLimitForce, Force, PrescribedForce};

impl Model {
    /// Build an immutable model from a chain configuration.
    ///
    /// # Errors
    ///
    /// Any configuration problem is reported here, before a state can be
    /// created: invalid parameters, unknown bodies or coordinates, a body
    /// claimed by two joints, a body with no parent joint, or a joint cycle
    /// detached from ground.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        config.validate()?;

        // Config index: 0 = ground, i + 1 = config.bodies[i]
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(config.bodies.len() + 1);
        index.insert(GROUND, 0);
        for (i, body) in config.bodies.iter().enumerate() {
            index.insert(body.name.as_str(), i + 1);
        }
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| SimError::BodyNotFound {
                    name: name.to_string(),
                })
        };

        let ncfg = config.bodies.len() + 1;
        let mut parent_joint: Vec<Option<usize>> = vec![None; ncfg];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); ncfg];
        for (j, joint) in config.joints.iter().enumerate() {
            let parent = lookup(&joint.parent)?;
            let child = lookup(&joint.child)?;
            if child == 0 {
                return Err(SimError::invalid_config(format!(
                    "joint {}: ground cannot be a child body",
                    joint.name
                )));
            }
            if let Some(first) = parent_joint[child] {
                return Err(SimError::DuplicateChild {
                    body: joint.child.clone(),
                    first: config.joints[first].name.clone(),
                    second: joint.name.clone(),
                });
            }
            parent_joint[child] = Some(j);
            children[parent].push(child);
        }

        // Pre-order walk from ground: parents always come before children.
        let mut order = Vec::with_capacity(ncfg);
        let mut stack = vec![0];
        while let Some(b) = stack.pop() {
            order.push(b);
            stack.extend(children[b].iter().rev());
        }
        if order.len() != ncfg {
            let mut reached = vec![false; ncfg];
            for &b in &order {
                reached[b] = true;
            }
            let missing = (1..ncfg).find(|&b| !reached[b]).unwrap_or(1);
            return Err(SimError::Disconnected {
                body: config.bodies[missing - 1].name.clone(),
            });
        }

        let mut model = Self::empty(config.name.clone());
        model.gravity = config.gravity.acceleration;

        // Config index -> model body id
        let mut body_id = vec![0usize; ncfg];
        for (id, &cfg) in order.iter().enumerate() {
            body_id[cfg] = id;
        }

        for &cfg in order.iter().skip(1) {
            let body = &config.bodies[cfg - 1];
            let Some(j) = parent_joint[cfg] else {
                return Err(SimError::Disconnected {
                    body: body.name.clone(),
                });
            };
            let joint = &config.joints[j];
            let id = body_id[cfg];
            let parent = body_id[index[joint.parent.as_str()]];
            let jnt_id = model.njnt;

            let mp = &body.mass_properties;
            model.body_name.push(body.name.clone());
            model.body_parent.push(parent);
            model.body_mass.push(mp.mass);
            model.body_ipos.push(mp.center_of_mass);
            model.body_inertia.push(mp.inertia);

            model.jnt_name.push(joint.name.clone());
            model.jnt_body.push(id);
            model.jnt_parent_frame.push(joint.parent_frame);
            model.jnt_child_frame.push(joint.child_frame);

            match &joint.kind {
                JointKind::Weld => {
                    model.jnt_type.push(JointType::Weld);
                    model.jnt_axis.push(Vector3::zeros());
                    model.jnt_coord.push(None);
                }
                JointKind::Pin { coordinate, axis } => {
                    let coord = model.nq;
                    let coord_parent = model.supporting_coordinates(parent).next();
                    model.jnt_type.push(JointType::Pin);
                    model.jnt_axis.push(axis.normalize());
                    model.jnt_coord.push(Some(coord));

                    model.coord_name.push(coordinate.name.clone());
                    model.coord_jnt.push(jnt_id);
                    model.coord_body.push(id);
                    model.coord_parent.push(coord_parent);
                    model.coord_default_value.push(coordinate.default_value);
                    model.coord_default_speed.push(coordinate.default_speed);
                    model.coord_damping.push(coordinate.damping);
                    model.nq += 1;
                }
            }

            model.nbody += 1;
            model.njnt += 1;
        }

        for force in &config.forces {
            let resolved = match force {
                ForceConfig::CoordinateLimit(cfg) => {
                    let coord = model.coordinate_id(&cfg.coordinate)?;
                    Force::CoordinateLimit(CoordinateLimitForce::new(cfg, coord))
                }
                ForceConfig::Prescribed(cfg) => {
                    let body = model.body_id(&cfg.body)?;
                    if body == 0 {
                        return Err(SimError::invalid_force(
                            &cfg.name,
                            "prescribed force cannot act on ground",
                        ));
                    }
                    Force::Prescribed(PrescribedForce::new(cfg, body))
                }
            };
            model.forces.push(resolved);
        }

        debug!(
            model = %model.name,
            nbody = model.nbody,
            nq = model.nq,
            nforce = model.forces.len(),
            "built chain model"
        );

        Ok(model)
    }
}
