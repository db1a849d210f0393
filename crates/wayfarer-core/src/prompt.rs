//! Prompt construction for the generative model.
//!
//! Deterministic string-template assembly; no control flow beyond
//! substitution, and inputs are never truncated. Each template ends with
//! an explicit output contract (JSON only, exact shape) because the
//! extractor downstream depends on it.

use serde_json::Value;

use crate::preferences::Preferences;

/// Season marker interpolated when the caller's preferences named none.
/// The template always carries a season value; "unset" tells the model
/// no constraint applies.
pub const SEASON_UNSET: &str = "unset";

/// Inputs for the itinerary-generation template.
#[derive(Debug, Clone)]
pub struct ItineraryContext {
    /// Destination the itinerary must cover.
    pub destination: String,
    /// Exact number of days the itinerary must span.
    pub duration_days: u32,
    /// Classified preferences (activity pace, season, other interests).
    pub preferences: Preferences,
}

/// Build the location-suggestion prompt.
///
/// The model is constrained to the requested region and must answer with
/// a `{"locations": [...]}` object only.
pub fn build_suggestion_prompt(region: &str, interests: &str, budget: Option<&str>) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(
        "You are a travel expert who recommends destinations strictly within a given region.\n",
    );
    prompt.push_str(&format!(
        "Absolute rule: every recommendation must lie within the region or continent '{region}'.\n\n",
    ));
    prompt.push_str("The traveller's main preferences:\n");
    prompt.push_str(&format!("- Interests: {interests}\n"));
    prompt.push_str(&format!(
        "- Budget: {}\n\n",
        budget.unwrap_or("not specified")
    ));
    prompt.push_str(&format!(
        "Based on these preferences, recommend the 3 most appealing real cities or countries within '{region}'.\n",
    ));
    prompt.push_str("Write all place names in Korean.\n");
    prompt.push_str("Respond with JSON only, no other text.\n");
    prompt.push_str("Expected shape: { \"locations\": [\"place 1\", \"place 2\", \"place 3\"] }\n");

    prompt
}

/// Build the full itinerary-generation prompt.
///
/// The day count is stated as a hard requirement, the activity count per
/// day comes from the classified preferences, and the season is always
/// interpolated ([`SEASON_UNSET`] when absent).
pub fn build_itinerary_prompt(ctx: &ItineraryContext) -> String {
    let season = ctx.preferences.season.as_deref().unwrap_or(SEASON_UNSET);
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "You are a meticulous travel expert whose plans can be verified on real map apps.\n",
    );
    prompt.push_str("Your first duty is a realistic, truthful itinerary.\n\n");

    prompt.push_str("Absolute rules:\n");
    prompt.push_str(
        "1. Only real places: every restaurant, cafe, and sight must actually exist and be searchable. Never invent a place name.\n",
    );
    prompt.push_str(
        "2. Cross-check: provide only information you are confident survives verification against multiple sources.\n",
    );
    prompt.push_str(
        "3. Language: write every place name in Korean (e.g. 'Starbucks' -> '스타벅스', 'Eiffel Tower' -> '에펠탑').\n\n",
    );

    prompt.push_str("Traveller requirements:\n");
    prompt.push_str(&format!("1. Destination: '{}'\n", ctx.destination));
    prompt.push_str(&format!(
        "2. Duration: plan exactly '{} days'. The number of dates must match -- this is a hard requirement.\n",
        ctx.duration_days
    ));
    prompt.push_str(&format!(
        "3. Season: '{season}'. Include activities and places that are at their best in this season.\n",
    ));
    prompt.push_str(&format!(
        "4. Pace: the traveller wants a '{}' schedule. Keep each day's activity count within '{}'. This is very important.\n",
        ctx.preferences.activity_level, ctx.preferences.activities_per_day
    ));
    prompt.push_str(&format!(
        "5. Other interests: {}\n\n",
        ctx.preferences.other_interests()
    ));

    prompt.push_str("Output format:\n");
    prompt.push_str("Respond with JSON only, no explanation or extra text.\n");
    prompt.push_str(&format!(
        "Expected shape: {{ \"recommendations\": [\"{}\"], \"itinerary\": {{ \"YYYY-MM-DD\": [{{ \"time\": \"HH:MM ~ HH:MM\", \"activity\": \"...\" }}] }} }}\n",
        ctx.destination
    ));

    prompt
}

/// Build the plan-question prompt.
///
/// Free-form question about an existing itinerary; the answer is prose,
/// so no JSON contract here.
pub fn build_question_prompt(plan: &Value, question: &str) -> String {
    let plan_json = serde_json::to_string_pretty(plan).unwrap_or_else(|_| plan.to_string());

    format!(
        "A user is asking a question about the travel plan below.\n\
         Travel plan: {plan_json}\n\
         Question: {question}\n\
         Answer kindly and concisely based on the plan above.\n"
    )
}

/// Build the lunch-menu recommendation prompt for a GPS position.
pub fn build_menu_prompt(lat: f64, lon: f64) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!(
        "The user's GPS position is latitude {lat}, longitude {lon}.\n\n",
    ));
    prompt.push_str("Recommend 3 lunch menu ideas for this position:\n");
    prompt.push_str(
        "- Use concrete dish names that real restaurants actually serve (e.g. 김치찌개, 회덮밥, 제육볶음).\n",
    );
    prompt.push_str("- Avoid repetitive choices; reflect the season, the location, and current trends.\n");
    prompt.push_str("- Respond with a JSON array of 3 objects and nothing else.\n\n");
    prompt.push_str(
        "Expected shape: [ { \"menu\": \"dish name\", \"description\": \"short description\", \"category\": \"한식/중식/일식/양식/기타\" } ]\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::classify;
    use serde_json::json;

    fn sample_context() -> ItineraryContext {
        ItineraryContext {
            destination: "Kyoto".to_string(),
            duration_days: 4,
            preferences: classify(&["relaxed", "autumn", "temples", "street food"]),
        }
    }

    #[test]
    fn suggestion_prompt_contains_region_and_contract() {
        let prompt = build_suggestion_prompt("Southeast Asia", "beaches, diving", Some("mid-range"));
        assert!(prompt.contains("'Southeast Asia'"));
        assert!(prompt.contains("beaches, diving"));
        assert!(prompt.contains("mid-range"));
        assert!(prompt.contains("JSON only"));
        assert!(prompt.contains("\"locations\""));
        assert!(prompt.contains("Korean"));
    }

    #[test]
    fn suggestion_prompt_without_budget() {
        let prompt = build_suggestion_prompt("Europe", "museums", None);
        assert!(prompt.contains("not specified"));
    }

    #[test]
    fn itinerary_prompt_interpolates_all_requirements() {
        let prompt = build_itinerary_prompt(&sample_context());
        assert!(prompt.contains("'Kyoto'"));
        assert!(prompt.contains("'4 days'"));
        assert!(prompt.contains("hard requirement"));
        assert!(prompt.contains("'autumn'"));
        assert!(prompt.contains("'relaxed'"));
        assert!(prompt.contains("3–4 per day"));
        assert!(prompt.contains("temples, street food"));
        assert!(prompt.contains("\"recommendations\""));
        assert!(prompt.contains("\"itinerary\""));
    }

    #[test]
    fn itinerary_prompt_uses_unset_season_marker() {
        let ctx = ItineraryContext {
            preferences: classify(&["relaxed"]),
            ..sample_context()
        };
        let prompt = build_itinerary_prompt(&ctx);
        assert!(prompt.contains(&format!("'{SEASON_UNSET}'")));
    }

    #[test]
    fn itinerary_prompt_placeholder_interests() {
        let ctx = ItineraryContext {
            preferences: classify(&["packed", "summer"]),
            ..sample_context()
        };
        let prompt = build_itinerary_prompt(&ctx);
        assert!(prompt.contains("no special preference"));
    }

    #[test]
    fn question_prompt_embeds_plan_and_question() {
        let plan = json!({"title": "Busan weekend", "itinerary": {}});
        let prompt = build_question_prompt(&plan, "Is day two too packed?");
        assert!(prompt.contains("Busan weekend"));
        assert!(prompt.contains("Is day two too packed?"));
    }

    #[test]
    fn menu_prompt_contains_coordinates_and_array_contract() {
        let prompt = build_menu_prompt(37.5665, 126.978);
        assert!(prompt.contains("37.5665"));
        assert!(prompt.contains("126.978"));
        assert!(prompt.contains("JSON array"));
    }
}
