//! Material handles and the clad-type catalog.
//!
//! The core never looks inside a material; it only resolves names to
//! [`MaterialId`] handles and records them as fills.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Opaque handle for a registered material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MaterialId(usize);

impl MaterialId {
    /// Position of the material in its registry.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Descriptive record kept for each registered material.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialRecord {
    /// Symbolic lookup name, e.g. `Fuel` or `Mod`.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Density in g/cc.
    pub density: f64,
}

/// Mapping from symbolic names to material handles.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MaterialRegistry {
    /// Records in registration order; a handle is an index into this list.
    records: Vec<MaterialRecord>,
    /// Name lookup.
    #[serde(skip)]
    by_name: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the materials of the reference core.
    ///
    /// # Examples
    /// ```
    /// use hexslice::MaterialRegistry;
    ///
    /// let registry = MaterialRegistry::reference();
    /// assert!(registry.lookup("Fuel").is_ok());
    /// assert!(registry.lookup("Unobtainium").is_err());
    /// ```
    #[must_use]
    pub fn reference() -> Self {
        let mut registry = Self::new();
        registry.register("Mod", "Water @ 10 MPa", 0.49);
        registry.register("Fuel", "Uranium Moly10", 19.0);
        registry.register("Zr4", "Zircaloy-4", 6.55);
        registry.register("SS316", "Stainless Steel 316", 8.0);
        registry.register("Air", "air", 0.001);
        registry.register("Copper", "copper", 9.0);
        registry.register("Poison", "Boron carbide", 2.52);
        registry
    }

    /// Register a material, returning its handle.
    ///
    /// Registering an existing name returns the handle already assigned to it.
    pub fn register(&mut self, name: &str, description: &str, density: f64) -> MaterialId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = MaterialId(self.records.len());
        self.records.push(MaterialRecord {
            name: name.to_owned(),
            description: description.to_owned(),
            density,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Resolve a symbolic name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownMaterial`] when `name` is not registered.
    pub fn lookup(&self, name: &str) -> Result<MaterialId, ConfigurationError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownMaterial(name.to_owned()))
    }

    /// Record stored for a handle.
    #[must_use]
    pub fn record(&self, id: MaterialId) -> Option<&MaterialRecord> {
        self.records.get(id.0)
    }

    /// Number of registered materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cladding alloys available for fuel pins and guide tubes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CladType {
    /// Zircaloy-4.
    Zr4,
    /// Stainless steel 316.
    #[serde(rename = "SS316")]
    Ss316,
}

impl CladType {
    /// Every entry of the catalog.
    pub const ALL: [CladType; 2] = [CladType::Zr4, CladType::Ss316];

    /// Multiplier converting an inner radius to the clad outer radius.
    #[must_use]
    pub const fn thickness_ratio(self) -> f64 {
        match self {
            CladType::Zr4 => 1.07,
            CladType::Ss316 => 1.05,
        }
    }

    /// Yield strength in MPa.
    #[must_use]
    pub const fn yield_strength(self) -> f64 {
        match self {
            CladType::Zr4 => 160.0,
            CladType::Ss316 => 205.0,
        }
    }

    /// Name of the matching entry in the material registry.
    #[must_use]
    pub const fn material_name(self) -> &'static str {
        match self {
            CladType::Zr4 => "Zr4",
            CladType::Ss316 => "SS316",
        }
    }
}

impl fmt::Display for CladType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.material_name())
    }
}

impl FromStr for CladType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CladType::ALL
            .into_iter()
            .find(|clad| clad.material_name() == s)
            .ok_or_else(|| ConfigurationError::UnknownCladType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clad_names_round_trip() {
        for clad in CladType::ALL {
            assert_eq!(clad.to_string().parse::<CladType>(), Ok(clad));
        }
        assert_eq!(
            "Inconel".parse::<CladType>(),
            Err(ConfigurationError::UnknownCladType("Inconel".to_owned()))
        );
    }

    #[test]
    fn every_clad_has_a_registered_material() {
        let registry = MaterialRegistry::reference();
        for clad in CladType::ALL {
            assert!(registry.lookup(clad.material_name()).is_ok());
            assert!(clad.thickness_ratio() >= 1.0);
        }
    }

    #[test]
    fn registering_twice_returns_same_handle() {
        let mut registry = MaterialRegistry::new();
        let first = registry.register("Mod", "water", 1.0);
        let second = registry.register("Mod", "other water", 0.5);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.record(first).map(|r| r.density), Some(1.0));
    }
}
