//! Function definition offered to the model for profile extraction.

use serde_json::json;

use super::types::FunctionDefinition;

pub const EXTRACT_FUNCTION_NAME: &str = "get_expert_information";

pub const SOCIAL_FIELDS: [&str; 5] = ["twitter", "linkedin", "github", "website", "email"];

pub fn expert_function() -> FunctionDefinition {
    FunctionDefinition {
        name: EXTRACT_FUNCTION_NAME,
        description: "Get the important information about the expert",
        parameters: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The full name (first name and last name) of the expert"
                },
                "affiliation": {
                    "type": "string",
                    "description": "The affiliation of the expert"
                },
                "location": {
                    "type": "string",
                    "description": "The location of the expert"
                },
                "summary": {
                    "type": "string",
                    "description": "Short summary, around 3 sentences of what the expert is doing and the experience. Translate it into English if that's not already the case. Write it ABOUT the person, in third person."
                },
                "socials": {
                    "type": "object",
                    "properties": socials_properties(),
                    "description": "The socials of the expert, if available"
                }
            }
        }),
    }
}

fn socials_properties() -> serde_json::Value {
    let properties = SOCIAL_FIELDS
        .iter()
        .map(|field| {
            let what = match *field {
                "website" | "email" => field.to_string(),
                _ => format!("{field} handle"),
            };
            (
                field.to_string(),
                json!({
                    "type": "string",
                    "description": format!("The {what} of the expert"),
                }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(properties)
}
