//! The endpoint that suggests a category for a transaction description.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    AppState, Error, catalog,
    suggestion::{CategorySuggester, MIN_SUGGESTION_LENGTH},
    transaction::category_select,
};

/// The state needed to suggest a category.
#[derive(Clone)]
pub struct SuggestionState {
    /// The suggester that maps descriptions to category labels.
    pub suggester: Arc<dyn CategorySuggester>,
}

impl FromRef<AppState> for SuggestionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            suggester: state.suggester.clone(),
        }
    }
}

/// The form data for a suggestion request.
#[derive(Debug, Deserialize)]
pub struct SuggestionForm {
    /// The transaction description to suggest a category for.
    #[serde(default)]
    pub description: String,
}

/// A route handler that suggests a category from the description field.
///
/// On success, responds with a fresh category dropdown with the suggested
/// category selected; the suggested label is matched case-insensitively
/// against the catalog and falls back to the "other" category when nothing
/// matches. Descriptions shorter than three characters are rejected before
/// the suggester is called. On failure an error alert is returned and the
/// category field is left for manual selection.
pub async fn suggest_category_endpoint(
    State(state): State<SuggestionState>,
    Form(form): Form<SuggestionForm>,
) -> Response {
    let description = form.description.trim();

    if description.chars().count() < MIN_SUGGESTION_LENGTH {
        return Error::SuggestionTooShort.into_alert_response();
    }

    match state.suggester.suggest(description) {
        Ok(label) => {
            let key = catalog::key_for_label(&label).unwrap_or(catalog::OTHER_KEY);

            category_select(Some(key)).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
