use crate::compilation::CompiledGraph;
use crate::resource::{CostType, ResourceCatalog};
use serde::Serialize;
use tracing::warn;

/// Cost components of one compiled network. `None` means unknown, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub direct: Option<f64>,
    pub indirect: Option<f64>,
    pub other: Option<f64>,
    pub total: Option<f64>,
}

/// Running sum that turns unknown as soon as one input is unknown.
#[derive(Debug, Clone, Copy)]
struct Component(Option<f64>);

impl Component {
    fn add(&mut self, amount: Option<f64>) {
        self.0 = match (self.0, amount) {
            (Some(sum), Some(amount)) => Some(sum + amount),
            _ => None,
        };
    }
}

/// Aggregates resource cost over the non-dummy activities of `compiled`.
///
/// Each assignment costs `rate * duration`. A resource without a usable rate
/// makes its own component unknown; an id missing from the catalog makes both
/// direct and indirect unknown since its cost type cannot be determined.
/// A disabled catalog or an invalid graph leaves only `other`.
pub fn cost(compiled: &CompiledGraph, catalog: &ResourceCatalog, other_cost: f64) -> CostBreakdown {
    let other = Some(other_cost).filter(|value| value.is_finite());
    if !compiled.is_valid() || catalog.disabled {
        return CostBreakdown {
            other,
            ..CostBreakdown::default()
        };
    }

    let mut direct = Component(Some(0.0));
    let mut indirect = Component(Some(0.0));

    for dependent in compiled.activities().iter().filter(|a| !a.is_dummy()) {
        let duration = dependent.duration() as f64;
        for &resource_id in &dependent.activity.resources {
            let Some(resource) = catalog.get(resource_id) else {
                warn!(
                    activity = dependent.id(),
                    resource = resource_id,
                    "activity references a resource missing from the catalog"
                );
                direct.add(None);
                indirect.add(None);
                continue;
            };

            let amount = catalog.rate_for(resource).map(|rate| rate * duration);
            if amount.is_none() {
                warn!(resource = resource.id, "resource has no usable cost rate");
            }
            match resource.cost_type {
                CostType::Direct => direct.add(amount),
                CostType::Indirect => indirect.add(amount),
            }
        }
    }

    let total = match (direct.0, indirect.0, other) {
        (Some(d), Some(i), Some(o)) => Some(d + i + o),
        _ => None,
    };

    CostBreakdown {
        direct: direct.0,
        indirect: indirect.0,
        other,
        total,
    }
}
