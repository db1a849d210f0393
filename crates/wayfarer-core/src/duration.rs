//! Trip-length phrase parsing.
//!
//! Users describe trip length in free text ("3박 4일", "1주일", "4일").
//! The itinerary prompt needs a concrete day count, so this module turns
//! the phrase into one, defaulting rather than erroring on anything it
//! cannot read.

/// Day count used when the phrase is absent or unparseable.
pub const DEFAULT_DAYS: u32 = 3;

/// Week unit suffix ("n주일" means n weeks).
const WEEK_UNIT: &str = "주일";
/// Day unit suffix ("n일" means n days; also the tail of "3박 4일").
const DAY_UNIT: &str = "일";

/// Convert an optional trip-length phrase into a positive day count.
///
/// The week pattern is checked before the day pattern, so a phrase
/// containing both resolves to the week-derived value. Unparseable input
/// silently falls back to [`DEFAULT_DAYS`].
pub fn days_from_phrase(phrase: Option<&str>) -> u32 {
    let Some(text) = phrase else {
        return DEFAULT_DAYS;
    };

    if let Some(weeks) = number_before_unit(text, WEEK_UNIT) {
        return weeks * 7;
    }
    if let Some(days) = number_before_unit(text, DAY_UNIT) {
        return days;
    }

    DEFAULT_DAYS
}

/// Find the first occurrence of `unit` that is directly preceded (modulo
/// whitespace) by a run of ASCII digits, and parse that run.
///
/// In "3박 4일" the "일" at the end is preceded by "4", while the "3" is
/// attached to "박" and therefore ignored.
fn number_before_unit(text: &str, unit: &str) -> Option<u32> {
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find(unit) {
        let unit_start = search_from + rel;

        // Walk backwards over whitespace, then collect digits.
        let prefix = &text[..unit_start];
        let trimmed = prefix.trim_end();
        let digits: String = trimmed
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        if !digits.is_empty() {
            if let Ok(n) = digits.parse::<u32>() {
                if n > 0 {
                    return Some(n);
                }
            }
        }

        search_from = unit_start + unit.len();
    }
    None
}
