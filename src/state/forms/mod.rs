//! Form domain layer
//!
//! Field model, step sequence, validation rules and the controller that ties
//! them together.

mod answers;
mod field;
mod form_state;
mod steps;
mod validator;

pub use answers::{AnswerSet, PersistedRecord};
pub use field::{FieldKind, FieldName, FieldValue, FileHandle};
pub use form_state::{FormController, FormError};
pub use steps::Step;
pub use validator::is_required;
