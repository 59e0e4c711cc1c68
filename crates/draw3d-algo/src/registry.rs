use crate::algorithm::Algorithm;
use crate::builtin;
use crate::error::SchedulerError;
use std::collections::BTreeMap;

pub type Factory = Box<dyn Fn() -> Box<dyn Algorithm> + Send + Sync>;

/// Algorithms available by name.
#[derive(Default)]
pub struct AlgorithmRegistry {
    factories: BTreeMap<String, Factory>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("rotate-x", || Box::new(builtin::Rotate::x()));
        registry.register("rotate-y", || Box::new(builtin::Rotate::y()));
        registry.register("rotate-z", || Box::new(builtin::Rotate::z()));
        registry.register("cylinder-ring", || Box::new(builtin::CylinderRing::default()));
        registry.register("damped-wave", || Box::new(builtin::DampedWave::default()));
        registry.register("drone-climb", || Box::new(builtin::DronePath::climb()));
        registry.register("drone-cross", || Box::new(builtin::DronePath::cross()));
        registry
    }

    /// Registers `factory` under `name`, replacing any earlier entry.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Algorithm> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Algorithm>, SchedulerError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SchedulerError::UnknownAlgorithm(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
