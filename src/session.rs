use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::project::{ProjectModel, ProjectSnapshot};

/// A project model shared between threads of a host application.
///
/// Mutation and recompilation happen under one writer lock, so no compile ever
/// sees a half-edited model. Readers only get fully compiled snapshots.
pub struct SharedProject {
    model: Mutex<ProjectModel>,
    snapshot: RwLock<Arc<ProjectSnapshot>>,
}

impl SharedProject {
    pub fn new(model: ProjectModel) -> Self {
        let snapshot = Arc::new(model.compile());
        Self {
            model: Mutex::new(model),
            snapshot: RwLock::new(snapshot),
        }
    }

    /// The most recent snapshot. Cheap; never blocks on a running compile for
    /// longer than the pointer swap.
    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        self.snapshot.read().clone()
    }

    /// Copy of the current model.
    pub fn model(&self) -> ProjectModel {
        self.model.lock().clone()
    }

    /// Applies `edit` and recompiles before releasing the writer lock. Several
    /// changes made inside one closure cost a single recompilation.
    pub fn edit<F, R>(&self, edit: F) -> (R, Arc<ProjectSnapshot>)
    where
        F: FnOnce(&mut ProjectModel) -> R,
    {
        let mut model = self.model.lock();
        let result = edit(&mut model);
        let snapshot = Arc::new(model.compile());
        *self.snapshot.write() = Arc::clone(&snapshot);
        debug!(
            activities = model.activities().len(),
            valid = snapshot.compiled.is_valid(),
            "shared project recompiled"
        );
        (result, snapshot)
    }
}

impl Default for SharedProject {
    fn default() -> Self {
        Self::new(ProjectModel::default())
    }
}
