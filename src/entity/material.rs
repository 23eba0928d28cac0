//! Physical materials

use std::borrow::Cow;

/// Named physical profile used by integration and collision response
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: Cow<'static, str>,
    /// Fraction of speed kept (and reversed) on a bounce
    pub elasticity: f64,
    /// Multiplier applied to the summed forces
    pub density: f64,
    /// Fraction of speed kept after each integration step
    pub roughness: f64,
}

impl Material {
    /// Neutral material: no damping, half-energy bounces
    pub const DEFAULT: Material = Material::preset("default", 0.5, 1.0, 1.0);
    /// Bouncy, light
    pub const RUBBER: Material = Material::preset("rubber", 0.9, 0.7, 0.98);
    /// Dull bounce, some damping
    pub const WOOD: Material = Material::preset("wood", 0.3, 0.6, 0.95);
    /// Hardly bounces, heavy
    pub const STEEL: Material = Material::preset("steel", 0.1, 1.2, 0.99);
    /// Floating, nearly unaffected by forces
    pub const AIR: Material = Material::preset("air", 1.0, 0.01, 1.0);
    /// Strong damping
    pub const WATER: Material = Material::preset("water", 0.1, 1.0, 0.8);
    /// Almost frictionless
    pub const ICE: Material = Material::preset("ice", 0.2, 0.9, 1.0);

    const fn preset(name: &'static str, elasticity: f64, density: f64, roughness: f64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            elasticity,
            density,
            roughness,
        }
    }

    /// Create a custom material
    pub fn new(name: impl Into<String>, elasticity: f64, density: f64, roughness: f64) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            elasticity,
            density,
            roughness,
        }
    }

    /// Look up a preset by (case-insensitive) name
    pub fn by_name(name: &str) -> Option<Material> {
        [
            Self::DEFAULT,
            Self::RUBBER,
            Self::WOOD,
            Self::STEEL,
            Self::AIR,
            Self::WATER,
            Self::ICE,
        ]
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Combine two materials for an interaction between them.
    ///
    /// Each field is the product of the corresponding fields.
    pub fn merge(&self, other: &Material) -> Material {
        Material {
            name: Cow::Owned(format!("{}+{}", self.name, other.name)),
            elasticity: self.elasticity * other.elasticity,
            density: self.density * other.density,
            roughness: self.roughness * other.roughness,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}
