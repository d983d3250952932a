//! Component catalog - the technology a faction can build ships from
//!
//! Components are grouped by category and kept in ascending order of
//! effectiveness. The catalog is read-only while a design is being fitted.

pub mod component;
pub mod weapons;

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{DesignError, Result};
use crate::core::types::ComponentId;

pub use component::{Component, ComponentCategory, ComponentKind, SpecialEffect};
pub use weapons::{WeaponClass, WeaponProfile};

const STANDARD_CATALOG: &str = include_str!("../../data/catalogs/standard.toml");

/// On-disk catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    component: Vec<Component>,
}

/// Ordering key for ascending effectiveness
pub fn effectiveness_key(component: &Component) -> (u32, ComponentId) {
    (component.level, component.id)
}

/// Per-category ordered component lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentCatalog {
    categories: AHashMap<ComponentCategory, Vec<Component>>,
}

impl ComponentCatalog {
    /// Build a catalog; ids are assigned in the given order
    pub fn new(components: Vec<Component>) -> Self {
        let mut categories: AHashMap<ComponentCategory, Vec<Component>> = AHashMap::new();
        for (index, mut component) in components.into_iter().enumerate() {
            component.id = ComponentId(index as u32 + 1);
            categories.entry(component.category()).or_default().push(component);
        }

        let mut catalog = Self { categories };
        catalog.sort_by_key(effectiveness_key);
        catalog
    }

    /// Re-sort every category with the given key
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&Component) -> K) {
        for list in self.categories.values_mut() {
            list.sort_by_key(|c| key(c));
        }
    }

    /// Parse a catalog from TOML `[[component]]` tables
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)?;
        let catalog = Self::new(file.component);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// The full built-in technology tree
    pub fn standard() -> Result<Self> {
        Self::from_toml_str(STANDARD_CATALOG)
    }

    fn validate(&self) -> Result<()> {
        for component in self.categories.values().flatten() {
            if component.name.is_empty() {
                return Err(DesignError::InvalidCatalog(format!("component {:?} has no name", component.id)));
            }
            if component.category() == ComponentCategory::Weapon && component.base_space == 0 {
                return Err(DesignError::InvalidCatalog(format!("weapon {} takes no space", component.name)));
            }
        }
        Ok(())
    }

    /// Variants of a category in ascending effectiveness; empty if none known
    pub fn components_of(&self, category: ComponentCategory) -> &[Component] {
        self.categories.get(&category).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.categories.values().flatten().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fastest warp among known engines
    pub fn max_warp(&self) -> u32 {
        self.components_of(ComponentCategory::Engine)
            .iter()
            .filter_map(|c| c.warp())
            .max()
            .unwrap_or(0)
    }

    /// Best combat speed any known maneuver unit can reach
    pub fn max_combat_speed(&self) -> u32 {
        self.components_of(ComponentCategory::Maneuver)
            .iter()
            .filter_map(|c| c.combat_speed())
            .max()
            .unwrap_or(1)
    }

    /// Specials matching a predicate, ascending effectiveness
    pub fn specials_where(&self, mut keep: impl FnMut(&SpecialEffect) -> bool) -> Vec<&Component> {
        self.components_of(ComponentCategory::Special)
            .iter()
            .filter(|c| c.special_effect().is_some_and(|e| keep(&e)))
            .collect()
    }

    /// Subset of the catalog researched up to a tech level
    pub fn up_to_level(&self, level: u32) -> Self {
        self.filtered(|c| c.level <= level)
    }

    /// Subset of the catalog matching a predicate, ids preserved
    pub fn filtered(&self, mut keep: impl FnMut(&Component) -> bool) -> Self {
        let categories = self
            .categories
            .iter()
            .map(|(category, list)| (*category, list.iter().filter(|c| keep(c)).cloned().collect::<Vec<_>>()))
            .filter(|(_, list)| !list.is_empty())
            .collect();
        Self { categories }
    }
}
