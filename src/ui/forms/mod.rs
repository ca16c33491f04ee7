//! Form rendering

mod field_renderer;
mod step_form;

pub use step_form::draw_step_form;
