//! Prompt templates for the two generation calls.

use tera::{Context, Tera};

use crate::error::CoreError;
use crate::models::request::WorksheetRequest;

const WORKSHEET_TEMPLATE_NAME: &str = "worksheet_prompt";

const WORKSHEET_TEMPLATE: &str = include_str!("../templates/worksheet_prompt.tera");

/// System instruction for the LaTeX translation call.
pub const LATEX_SYSTEM_PROMPT: &str = "Return Content as Latex. Return Latex Only.";

/// Render the worksheet instruction for a request.
///
/// Field values are substituted verbatim; no escaping is applied.
pub fn worksheet_prompt(request: &WorksheetRequest) -> Result<String, CoreError> {
    let mut tera = Tera::default();
    tera.add_raw_template(WORKSHEET_TEMPLATE_NAME, WORKSHEET_TEMPLATE)?;

    let mut context = Context::new();
    context.insert("subject", request.subject.trim());
    context.insert("audience", request.audience.trim());
    context.insert("objectives", request.objectives.trim());
    context.insert("details", request.details().unwrap_or_default());

    let rendered = tera.render(WORKSHEET_TEMPLATE_NAME, &context)?;
    Ok(rendered)
}
