//! Output schemas handed to the model alongside each prompt

use serde_json::json;

use super::model::OutputSchema;

pub fn prospect_insight() -> OutputSchema {
    OutputSchema {
        name: "prospect_insight",
        schema: json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "A concise summary paragraph of the most important, actionable insights about the prospect for a sales outreach email."
                }
            },
            "required": ["summary"],
            "additionalProperties": false
        }),
    }
}

pub fn personalized_email() -> OutputSchema {
    OutputSchema {
        name: "personalized_email",
        schema: json!({
            "type": "object",
            "properties": {
                "subjectLine": {
                    "type": "string",
                    "description": "The subject line of the email."
                },
                "body": {
                    "type": "string",
                    "description": "The body of the email."
                }
            },
            "required": ["subjectLine", "body"],
            "additionalProperties": false
        }),
    }
}

pub fn email_effectiveness() -> OutputSchema {
    let percentage = |description: &str| {
        json!({
            "type": "number",
            "minimum": 0,
            "maximum": 100,
            "description": description
        })
    };

    OutputSchema {
        name: "email_effectiveness",
        schema: json!({
            "type": "object",
            "properties": {
                "effectivenessScore": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 100,
                    "description": "A score from 0 to 100 representing the predicted effectiveness of the email, where 100 is perfect."
                },
                "engagementPredictions": {
                    "type": "object",
                    "description": "Predictions of key engagement metrics for the email.",
                    "properties": {
                        "openRate": percentage("The predicted open rate of the email (as a percentage, e.g., 45.5 for 45.5%)."),
                        "clickThroughRate": percentage("The predicted click through rate of the email (as a percentage)."),
                        "conversionRate": percentage("The predicted conversion rate of the email (as a percentage, based on the stated goal).")
                    },
                    "required": ["openRate", "clickThroughRate", "conversionRate"],
                    "additionalProperties": false
                },
                "suggestions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of specific, actionable suggestions for improving the email, phrased as clear instructions."
                }
            },
            "required": ["effectivenessScore", "engagementPredictions", "suggestions"],
            "additionalProperties": false
        }),
    }
}
