//! Embedded prompt templates
//!
//! Compiled into the binary and used when no override file is found.

/// System prompt for itinerary generation
pub const ITINERARY_SYSTEM: &str = r#"You are an expert travel planner. You write practical, day-by-day itineraries
that respect the traveler's budget, preferences and the weather forecast.
Answer in plain text without markdown tables."#;

/// User prompt for itinerary generation
pub const ITINERARY_PROMPT: &str = r#"Create a detailed {{duration}}-day itinerary for a {{travel_type}} trip to {{destination}}.

Travel dates: {{travel_dates}}
Traveling from: {{origin}}
Total budget: {{budget}}
Preferences: {{preferences}}

Weather: {{weather_summary}}
{{#if weather_analysis}}
{{weather_analysis}}
{{/if}}
{{#if days}}

Daily forecast:
{{#each days}}
- Day {{number}} ({{day_name}} {{date}}): {{weather}} - {{level}}
{{/each}}
{{/if}}
{{#if flights}}

Flight options:
{{#each flights}}
- {{this}}
{{/each}}
{{/if}}
{{#if hotels}}

Hotel options:
{{#each hotels}}
- {{this}}
{{/each}}
{{/if}}
{{#if attractions}}

Attractions:
{{#each attractions}}
- {{this}}
{{/each}}
{{/if}}
{{#if feedback}}

The traveler asked for these changes to the previous plan: {{feedback}}
{{/if}}

Structure the plan as "Day 1", "Day 2" and so on, each with Morning, Afternoon and
Evening sections. Recommend a hotel, name restaurants for meals and plan activities
suited to each day's weather, with indoor options on poor-weather days. Finish with
practical tips and an estimated cost breakdown that stays within the budget."#;

/// Deterministic itinerary used when generation fails
pub const FALLBACK_ITINERARY: &str = r#"{{duration}}-DAY ITINERARY FOR {{destination}}
{{travel_dates}} | Budget: {{budget}} | {{travel_type}} trip

Weather outlook: {{weather_summary}}

{{#each days}}
Day {{number}}{{#if date}} - {{day_name}} {{date}}{{/if}}
Weather: {{weather}}{{#if level}} ({{level}}){{/if}}
  Morning: {{morning}}
  Afternoon: {{afternoon}}
  Evening: {{evening}}
{{#if advice}}
  Tips: {{advice}}
{{/if}}

{{/each}}
Hotel: {{stay}}
{{#if flight}}
Getting there: {{flight}}
{{/if}}

Travel tips:
- Book popular activities and restaurant reservations in advance
- Keep digital and paper copies of travel documents
- Check the forecast each morning and swap outdoor and indoor plans as needed
- Keep a daily spending log to stay within the {{budget}} budget"#;

/// System prompt for alternative suggestions
pub const ALTERNATIVES_SYSTEM: &str = r#"You are a helpful travel advisor. When a trip cannot be planned as requested,
you suggest practical alternatives the traveler can act on."#;

/// User prompt for alternative suggestions
pub const ALTERNATIVES_PROMPT: &str = r#"A trip to {{destination}} ({{travel_dates}}, {{duration}} days, budget {{budget}}) could not be planned as requested.
Problem: {{issue}}
Traveler preferences: {{preferences}}

Suggest exactly 3 alternatives, such as different dates, nearby destinations or changed activities.
Write them as a numbered list ("1. ...") with one suggestion per line and no heading or other text."#;

/// Get an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "itinerary-system" => Some(ITINERARY_SYSTEM),
        "itinerary" => Some(ITINERARY_PROMPT),
        "itinerary-fallback" => Some(FALLBACK_ITINERARY),
        "alternatives-system" => Some(ALTERNATIVES_SYSTEM),
        "alternatives" => Some(ALTERNATIVES_PROMPT),
        _ => None,
    }
}
