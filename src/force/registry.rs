//! Ordered collection of force functions.

use super::{Force, ForceId};
use crate::error::SimulationError;
use crate::graph::BodyGraph;

/// Forces in registration order, partitioned into body and link forces.
///
/// A force that is both a body force and a link force appears in both
/// partitions. Handles stay valid as the registry grows.
#[derive(Debug, Default)]
pub struct ForceRegistry {
    forces: Vec<Box<dyn Force>>,
    body_forces: Vec<usize>,
    link_forces: Vec<usize>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a force and return its handle.
    pub fn add(&mut self, force: Box<dyn Force>) -> ForceId {
        let index = self.forces.len();
        if force.is_body_force() {
            self.body_forces.push(index);
        }
        if force.is_link_force() {
            self.link_forces.push(index);
        }
        ftlog::debug!(
            "registered {} as Force({index}) (body: {}, link: {})",
            force.name(),
            force.is_body_force(),
            force.is_link_force()
        );
        self.forces.push(force);
        ForceId(index as u32)
    }

    pub fn get(&self, id: ForceId) -> Option<&dyn Force> {
        self.forces.get(id.0 as usize).map(|f| f.as_ref())
    }

    pub fn get_mut(&mut self, id: ForceId) -> Option<&mut (dyn Force + 'static)> {
        self.forces.get_mut(id.0 as usize).map(|f| f.as_mut())
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ForceId, &dyn Force)> + '_ {
        self.forces
            .iter()
            .enumerate()
            .map(|(i, f)| (ForceId(i as u32), f.as_ref()))
    }

    /// Read a parameter of a registered force.
    ///
    /// # Errors
    ///
    /// * `UnknownForce` if `id` is not registered.
    /// * `UnknownParameter` if the force has no such parameter.
    pub fn parameter(&self, id: ForceId, name: &str) -> Result<f32, SimulationError> {
        let force = self.get(id).ok_or(SimulationError::UnknownForce(id))?;
        force.parameter(name).ok_or_else(|| SimulationError::UnknownParameter {
            force: force.name(),
            name: name.to_string(),
        })
    }

    /// Set a parameter of a registered force.
    pub fn set_parameter(&mut self, id: ForceId, name: &str, value: f32) -> Result<(), SimulationError> {
        let force = self.get_mut(id).ok_or(SimulationError::UnknownForce(id))?;
        force.set_parameter(name, value)
    }

    /// Rebuild every body's force accumulator from the registered forces.
    ///
    /// Every force is initialized once, in registration order. Then each body
    /// has its accumulator zeroed and the body forces applied, and finally the
    /// link forces are applied to every link.
    pub fn accumulate(&mut self, graph: &mut BodyGraph) {
        let Self {
            forces,
            body_forces,
            link_forces,
        } = self;

        for force in forces.iter_mut() {
            force.init(graph);
        }

        graph.for_each_body_mut(|id, body| {
            body.reset_force();
            for &i in body_forces.iter() {
                forces[i].apply_to_body(id, body);
            }
        });

        if !link_forces.is_empty() {
            graph.for_each_link_mut(|link, a, b| {
                for &i in link_forces.iter() {
                    forces[i].apply_to_link(link, a, b);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::force::ParamSpec;
    use crate::graph::{Body, BodyId, Link};

    /// Records every call it receives into a shared log.
    #[derive(Debug)]
    struct Recorder {
        tag: &'static str,
        body: bool,
        link: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn new(tag: &'static str, body: bool, link: bool, log: &Arc<Mutex<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                tag,
                body,
                link,
                log: Arc::clone(log),
            })
        }
    }

    impl Force for Recorder {
        fn name(&self) -> &'static str {
            "Recorder"
        }
        fn is_body_force(&self) -> bool {
            self.body
        }
        fn is_link_force(&self) -> bool {
            self.link
        }
        fn parameters(&self) -> &'static [ParamSpec] {
            &[]
        }
        fn parameter(&self, _name: &str) -> Option<f32> {
            None
        }
        fn set_parameter(&mut self, name: &str, _value: f32) -> Result<(), SimulationError> {
            Err(SimulationError::UnknownParameter {
                force: self.name(),
                name: name.to_string(),
            })
        }
        fn init(&mut self, _graph: &BodyGraph) {
            self.log.lock().unwrap().push(format!("{}:init", self.tag));
        }
        fn apply_to_body(&mut self, id: BodyId, body: &mut Body) {
            body.add_force(1.0, 0.0);
            self.log.lock().unwrap().push(format!("{}:{id}", self.tag));
        }
        fn apply_to_link(&mut self, link: &Link, a: &mut Body, b: &mut Body) {
            a.add_force(0.0, 1.0);
            b.add_force(0.0, -1.0);
            self.log.lock().unwrap().push(format!("{}:{}-{}", self.tag, link.a(), link.b()));
        }
    }

    #[test]
    fn test_partitions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ForceRegistry::new();
        registry.add(Recorder::new("a", true, false, &log));
        registry.add(Recorder::new("b", false, true, &log));
        registry.add(Recorder::new("c", true, true, &log));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.body_forces, vec![0, 2]);
        assert_eq!(registry.link_forces, vec![1, 2]);
    }

    #[test]
    fn test_accumulate_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ForceRegistry::new();
        registry.add(Recorder::new("body", true, false, &log));
        registry.add(Recorder::new("link", false, true, &log));

        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        let b = graph.add_body(Body::at(1.0, 0.0));
        graph.add_link(a, b, -1.0, -1.0).unwrap();

        registry.accumulate(&mut graph);

        let log = log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec!["body:init", "link:init", "body:Body(0)", "body:Body(1)", "link:Body(0)-Body(1)"]
        );
        assert_eq!(graph.body(a).unwrap().force, [1.0, 1.0]);
        assert_eq!(graph.body(b).unwrap().force, [1.0, -1.0]);
    }

    #[test]
    fn test_accumulate_resets_previous_forces() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ForceRegistry::new();
        registry.add(Recorder::new("body", true, false, &log));

        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        graph.body_mut(a).unwrap().force = [50.0, 50.0];

        registry.accumulate(&mut graph);
        registry.accumulate(&mut graph);
        assert_eq!(graph.body(a).unwrap().force, [1.0, 0.0]);
    }

    #[test]
    fn test_accumulate_without_forces_zeroes() {
        let mut registry = ForceRegistry::new();
        let mut graph = BodyGraph::new();
        let a = graph.add_body(Body::at(0.0, 0.0));
        graph.body_mut(a).unwrap().force = [3.0, -3.0];

        registry.accumulate(&mut graph);
        assert_eq!(graph.body(a).unwrap().force, [0.0, 0.0]);
    }

    #[test]
    fn test_unknown_force() {
        let mut registry = ForceRegistry::new();
        let missing = ForceId(4);
        assert_eq!(registry.parameter(missing, "Any"), Err(SimulationError::UnknownForce(missing)));
        assert_eq!(
            registry.set_parameter(missing, "Any", 1.0),
            Err(SimulationError::UnknownForce(missing))
        );
    }
}
