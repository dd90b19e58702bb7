//! Catalogue of available algorithms.
//!
//! [`AlgorithmHost`](crate::AlgorithmHost) manages a single *active*
//! algorithm. `AlgoRegistry` is the step before that: it enumerates the
//! algorithms a runner can instantiate by name, each represented by an
//! [`AlgoMeta`] plus a factory closure producing a fresh boxed instance.
//! Every `instantiate` call runs the factory anew — algorithms carry
//! per-run mutable state that must not leak across runs.

use crate::Algorithm;

/// Thread-safe factory closure producing a fresh algorithm instance.
pub type AlgoFactory = Box<dyn Fn() -> Box<dyn Algorithm> + Send + Sync>;

/// Static metadata for a registered algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgoMeta {
    /// Unique registry key.
    pub name: String,
    pub version: String,
    pub description: String,
}

impl AlgoMeta {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// Registry misuse errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateName { name: String },
    UnknownAlgorithm { name: String },
    EmptyName,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateName { name } => {
                write!(f, "algorithm '{name}' is already registered")
            }
            RegistryError::UnknownAlgorithm { name } => {
                write!(f, "no algorithm named '{name}' is registered")
            }
            RegistryError::EmptyName => write!(f, "algorithm name must not be empty"),
        }
    }
}

impl std::error::Error for RegistryError {}

struct RegistryEntry {
    meta: AlgoMeta,
    factory: AlgoFactory,
}

/// Catalogue of available algorithms and their factories.
///
/// Insertion order is preserved in `list()` output, so enumeration is
/// deterministic.
pub struct AlgoRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for AlgoRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgoRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register<F>(&mut self, meta: AlgoMeta, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Algorithm> + Send + Sync + 'static,
    {
        if meta.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.contains(&meta.name) {
            return Err(RegistryError::DuplicateName {
                name: meta.name.clone(),
            });
        }
        self.entries.push(RegistryEntry {
            meta,
            factory: Box::new(factory),
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.meta.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Metadata for all registered algorithms, in insertion order.
    pub fn list(&self) -> Vec<&AlgoMeta> {
        self.entries.iter().map(|e| &e.meta).collect()
    }

    pub fn lookup(&self, name: &str) -> Result<&AlgoMeta, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.meta.name == name)
            .map(|e| &e.meta)
            .ok_or_else(|| RegistryError::UnknownAlgorithm {
                name: name.to_string(),
            })
    }

    /// Instantiate a fresh algorithm by name.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Algorithm>, RegistryError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.meta.name == name)
            .ok_or_else(|| RegistryError::UnknownAlgorithm {
                name: name.to_string(),
            })?;
        Ok((entry.factory)())
    }
}
