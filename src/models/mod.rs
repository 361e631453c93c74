pub mod catalog;
pub mod field;
pub mod form;
pub mod outcome;

pub use catalog::{AppointmentSlot, Catalog};
pub use field::{Command, Field, FieldKey, FieldType, Stage};
pub use form::{FieldValue, FormId, FormRecord, FormSnapshot};
pub use outcome::StepOutcome;
