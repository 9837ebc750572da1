use tracing::{debug, warn};

use super::schema::EXTRACT_FUNCTION_NAME;
use super::types::{ChatCompletionResponse, ResponseMessage};
use crate::expert::ExpertProfile;

fn first_message(response: &ChatCompletionResponse) -> Option<&ResponseMessage> {
    response
        .choices
        .as_ref()
        .and_then(|c| c.first())
        .map(|choice| &choice.message)
}

/// Text content of the first choice, taken verbatim.
pub fn extract_text(response: &ChatCompletionResponse) -> Option<String> {
    first_message(response).and_then(|m| m.content.clone())
}

/// Profile from the first choice's function call.
///
/// `None` when the model declined to call the function or when its arguments
/// do not decode into a profile.
pub fn extract_profile(response: &ChatCompletionResponse) -> Option<ExpertProfile> {
    let message = first_message(response)?;
    debug!(?message, "extraction reply");
    let Some(call) = message.function_call.as_ref() else {
        debug!("model declined to call the extraction function");
        return None;
    };

    if call.name != EXTRACT_FUNCTION_NAME {
        warn!(name = %call.name, "model called an unknown function");
    }

    match serde_json::from_str::<ExpertProfile>(&call.arguments) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "malformed function-call arguments, skipping result");
            None
        }
    }
}
