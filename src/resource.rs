use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ResourceId = i32;

/// How a resource's cost is booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Direct,
    Indirect,
}

/// A resource (person, crew, equipment, cost bucket) in the caller's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub cost_type: CostType,
    /// Cost per duration unit. Non-negative when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    /// Units of this resource available at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<u32>,
}

impl Resource {
    pub fn new(id: ResourceId, name: impl Into<String>, cost_type: CostType) -> Self {
        Self {
            id,
            name: name.into(),
            cost_type,
            unit_cost: None,
            availability: None,
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }
}

/// Resources referenced by id from activities. Never embedded in the activity model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    resources: BTreeMap<ResourceId, Resource>,
    /// Explicit rate for resources that carry none of their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_unit_cost: Option<f64>,
    /// Switches resource costing off; direct and indirect cost become unknown.
    #[serde(default)]
    pub disabled: bool,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources<I>(resources: I) -> Self
    where
        I: IntoIterator<Item = Resource>,
    {
        let mut catalog = Self::new();
        for resource in resources {
            catalog.insert(resource);
        }
        catalog
    }

    /// Adds or replaces a resource, returning the previous entry for that id.
    pub fn insert(&mut self, resource: Resource) -> Option<Resource> {
        self.resources.insert(resource.id, resource)
    }

    pub fn remove(&mut self, id: ResourceId) -> Option<Resource> {
        self.resources.remove(&id)
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Rate used for costing: the resource's own rate, else the catalog default.
    /// `None` when neither is set or the value is not a valid rate.
    pub fn rate_for(&self, resource: &Resource) -> Option<f64> {
        resource
            .unit_cost
            .or(self.default_unit_cost)
            .filter(|rate| rate.is_finite() && *rate >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_falls_back_to_catalog_default() {
        let mut catalog = ResourceCatalog::with_resources([
            Resource::new(1, "Dev", CostType::Direct).with_unit_cost(100.0),
            Resource::new(2, "PM", CostType::Indirect),
        ]);
        let pm = catalog.get(2).cloned().unwrap();
        assert_eq!(catalog.rate_for(&pm), None);

        catalog.default_unit_cost = Some(40.0);
        assert_eq!(catalog.rate_for(&pm), Some(40.0));
        let dev = catalog.get(1).cloned().unwrap();
        assert_eq!(catalog.rate_for(&dev), Some(100.0));
    }

    #[test]
    fn negative_rate_is_not_a_rate() {
        let catalog = ResourceCatalog::with_resources([
            Resource::new(1, "Broken", CostType::Direct).with_unit_cost(-3.0),
        ]);
        let broken = catalog.get(1).cloned().unwrap();
        assert_eq!(catalog.rate_for(&broken), None);
    }
}
