//! Tera template engine setup.

use tera::Tera;

use crate::config::TEMPLATE_GLOB;
use crate::error::AppError;

/// Initialize the Tera template engine from the template directory.
pub fn init_templates() -> Result<Tera, AppError> {
    Ok(Tera::new(TEMPLATE_GLOB)?)
}
