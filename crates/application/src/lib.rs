//! Application layer - catalog lookups and form workflows

pub mod catalog;
pub mod forms;

pub use catalog::Catalog;
pub use forms::{AutomationWizard, DeviceWizard, FormError, SensorWizard, Submission};
