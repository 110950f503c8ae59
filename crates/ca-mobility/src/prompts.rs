//! Prompt templates for the mobility units.

use ca_oracle::PromptTemplate;

pub const PLACE_TYPE: PromptTemplate = PromptTemplate::new(
    "As an intelligent decision system, please determine the type of place the user needs to visit \
based on their input requirement.
User Plan: {plan}
User requirement: {intention}
Your output must be a single selection from {labels} without any additional text or explanation.

Please respond in JSON format (do not return any other text), for example:
{{
    \"place_type\": \"shopping\"
}}",
);

pub const PLACE_SUBTYPE: PromptTemplate = PromptTemplate::new(
    "As an intelligent decision system, please determine the specific kind of {category} place the \
user needs to visit based on their input requirement.
User Plan: {plan}
User requirement: {intention}
Your output must be a single selection from {labels} without any additional text or explanation.

Please respond in JSON format (do not return any other text), for example:
{{
    \"place_type\": \"bookstore\"
}}",
);

pub const RADIUS: PromptTemplate = PromptTemplate::new(
    "As an intelligent decision system, please determine the maximum travel radius (in meters) based \
on the current emotional state.

Current weather: {weather}
Current temperature: {temperature}
Your current emotion: {emotion_types}
Your current thought: {thought}

Please analyze how these emotions would affect travel willingness and return only a single integer \
number between {min} and {max} representing the maximum travel radius in meters. A more positive \
emotional state generally leads to greater willingness to travel further.

Please respond in JSON format (do not return any other text), for example:
{{
    \"radius\": 10000
}}",
);

pub const PLACE_ANALYSIS: PromptTemplate = PromptTemplate::new(
    "As an intelligent analysis system, please determine the type of place the user needs to visit \
based on their input requirement.
User Plan: {plan}
User requirement: {intention}

Your output must be a single selection from {labels} without any additional text or explanation.

Please respond in JSON format (do not return any other text), for example:
{{
    \"place_type\": \"home\"
}}",
);

/// JSON key every place-type prompt asks for.
pub const PLACE_TYPE_FIELD: &str = "place_type";

pub const RADIUS_FIELD: &str = "radius";
