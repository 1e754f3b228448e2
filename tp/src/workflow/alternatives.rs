//! Alternative suggestions: parsing generated text and fixed fallbacks

/// Number of alternatives offered
pub const ALTERNATIVE_COUNT: usize = 3;

/// Strip a leading "1." / "2)" / "-" / "*" / "•" marker
fn strip_marker(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = if digits > 0 {
        let after = &line[digits..];
        after
            .strip_prefix('.')
            .or_else(|| after.strip_prefix(')'))
            .unwrap_or(after)
    } else {
        line.strip_prefix(['-', '*', '•']).unwrap_or(line)
    };
    rest.trim()
}

/// Extract up to three suggestions from generated text
///
/// Blank lines and headers beginning "Alternative" are skipped; list
/// markers are removed.
pub fn parse_alternatives(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Alternative"))
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .take(ALTERNATIVE_COUNT)
        .map(String::from)
        .collect()
}

/// Suggestions used when none could be generated
pub fn fallback_alternatives(destination: &str) -> Vec<String> {
    vec![
        format!("Visit {} on different dates when the forecast is more favorable", destination),
        format!(
            "Focus on indoor attractions in {} such as museums, galleries and food markets",
            destination
        ),
        "Consider a nearby destination with better conditions for your travel dates".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbered_list() {
        let text = "Alternatives for your trip:\n\n1. Go to Porto instead\n2) Travel in September\n3. Try a cooking class\n4. Extra";
        assert_eq!(
            parse_alternatives(text),
            vec!["Go to Porto instead", "Travel in September", "Try a cooking class"]
        );
    }

    #[test]
    fn test_parse_bullets_and_plain_lines() {
        let text = "- Visit Sintra\n* Stay near the coast\nTake the tram";
        assert_eq!(
            parse_alternatives(text),
            vec!["Visit Sintra", "Stay near the coast", "Take the tram"]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_alternatives("").is_empty());
        assert!(parse_alternatives("Alternative 1:\n\n  \n1.").is_empty());
    }

    #[test]
    fn test_fallback_mentions_destination() {
        let fallback = fallback_alternatives("Lisbon");
        assert_eq!(fallback.len(), ALTERNATIVE_COUNT);
        assert!(fallback[0].contains("Lisbon"));
        assert!(fallback[1].contains("Lisbon"));
    }
}
