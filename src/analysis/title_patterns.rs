//! Title-pattern lift analysis
//!
//! Each rule is a predicate over the title text. A video either matches or it doesn't;
//! rules overlap freely and are evaluated independently.

use super::stats::{average, round_half_up_signed};
use crate::models::VideoRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Lift (in percent) beyond which a pattern is classified as positive or negative
pub const DIRECTION_THRESHOLD: i64 = 15;

/// Below this many matching videos consumers should treat the direction as noise
pub const MIN_RELIABLE_MATCHES: usize = 3;

/// A named predicate over a video title
#[derive(Debug)]
pub struct TitleRule {
    pub name: &'static str,
    regex: Regex,
}

impl TitleRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Invalid title pattern regex"),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        self.regex.is_match(title)
    }
}

/// The fixed rule catalog. Pronoun and caps rules are case-sensitive, vocabulary rules are not.
///
/// Word boundaries and case folding are ASCII-only: an accented letter counts as a
/// non-word character, so `problem` matches inside "problemática".
static TITLE_RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    vec![
        TitleRule::new("Numbers", r"[0-9]+"),
        TitleRule::new("Question marks", r"\?"),
        TitleRule::new("How to / How I", r"(?-u:\b)(?i-u:how)\s+(?i-u:to|i)(?-u:\b)"),
        TitleRule::new(
            "Strong emotion words",
            r"(?-u:\b)(?i-u:brutal|hard|honest|truth|crisis|shocking|insane|impossible|devastating|terrifying|crazy|incredible|amazing|unbelievable)(?-u:\b)",
        ),
        TitleRule::new(
            "Negative framing",
            r"(?-u:\b)(?i-u:worst|never|don't|stop|quit|fail|wrong|bad|hate|ugly|mistake|problem|lose|risk|danger)(?-u:\b)",
        ),
        TitleRule::new("ALL CAPS words", r"(?-u:\b)[A-Z]{3,}(?-u:\b)"),
        TitleRule::new("Personal framing (I/My)", r"(?-u:\b)(I|My|I'm|I've|I'll|Me)(?-u:\b)"),
        TitleRule::new(
            "Promise language",
            r"(?-u:\b)(?i-u:guaranteed|promise|secret|exactly|proven|ultimate|complete|definitive|must|need)(?-u:\b)",
        ),
        TitleRule::new("Brackets/parentheses", r"[\[(]"),
        TitleRule::new("Listicle (starts with number)", r"^[0-9]+\s"),
        TitleRule::new("Colon/dash separator", r"[:\x{2013}\x{2014}-]\s"),
    ]
});

/// All built-in title rules, in report order
pub fn title_rules() -> &'static [TitleRule] {
    &TITLE_RULES
}

/// Whether a pattern's videos out- or under-perform the rest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatternDirection {
    Positive,
    Negative,
    Neutral,
}

impl PatternDirection {
    pub fn from_lift(lift: i64) -> Self {
        if lift > DIRECTION_THRESHOLD {
            PatternDirection::Positive
        } else if lift < -DIRECTION_THRESHOLD {
            PatternDirection::Negative
        } else {
            PatternDirection::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternDirection::Positive => "positive",
            PatternDirection::Negative => "negative",
            PatternDirection::Neutral => "neutral",
        }
    }
}

/// Lift of one title rule over the long-form catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TitlePattern {
    pub name: String,
    pub match_count: usize,
    pub non_match_count: usize,
    pub avg_views_with: u64,
    pub avg_views_without: u64,
    /// Percent difference of matching vs non-matching average views
    pub lift: i64,
    pub direction: PatternDirection,
}

impl TitlePattern {
    /// True when enough videos match for the direction to be meaningful
    pub fn is_reliable(&self) -> bool {
        self.match_count >= MIN_RELIABLE_MATCHES
    }
}

/// `round((with - without) / without * 100)`, or 0 when nothing sits on the non-matching side
pub fn compute_lift(avg_with: u64, avg_without: u64) -> i64 {
    if avg_without == 0 {
        return 0;
    }
    let with = avg_with as f64;
    let without = avg_without as f64;
    round_half_up_signed((with - without) / without * 100.0)
}

/// Evaluate every built-in rule against the long-form titles
pub fn analyze_title_patterns(long_form: &[VideoRecord]) -> Vec<TitlePattern> {
    title_rules()
        .iter()
        .map(|rule| evaluate_rule(rule, long_form))
        .collect()
}

fn evaluate_rule(rule: &TitleRule, videos: &[VideoRecord]) -> TitlePattern {
    let (matching, non_matching): (Vec<&VideoRecord>, Vec<&VideoRecord>) =
        videos.iter().partition(|v| rule.matches(&v.title));

    let with: Vec<u64> = matching.iter().map(|v| v.view_count).collect();
    let without: Vec<u64> = non_matching.iter().map(|v| v.view_count).collect();

    let avg_views_with = average(&with);
    let avg_views_without = average(&without);
    let lift = compute_lift(avg_views_with, avg_views_without);

    TitlePattern {
        name: rule.name.to_string(),
        match_count: matching.len(),
        non_match_count: non_matching.len(),
        avg_views_with,
        avg_views_without,
        lift,
        direction: PatternDirection::from_lift(lift),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rule(name: &str) -> &'static TitleRule {
        title_rules().iter().find(|r| r.name == name).unwrap()
    }

    fn titled(pairs: &[(&str, u64)]) -> Vec<VideoRecord> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, (title, views))| VideoRecord::new(format!("v{}", i), *title, at, *views, 0, 0, 600))
            .collect()
    }

    #[test]
    fn test_catalog_has_eleven_rules() {
        assert_eq!(title_rules().len(), 11);
        let patterns = analyze_title_patterns(&[]);
        assert_eq!(patterns.len(), 11);
        assert!(patterns.iter().all(|p| p.lift == 0 && p.direction == PatternDirection::Neutral));
    }

    #[test]
    fn test_numbers_lift() {
        let videos = titled(&[("Top 10 Tips", 1000), ("My Story", 100), ("5 Ways to Win", 1000)]);
        let patterns = analyze_title_patterns(&videos);
        let numbers = patterns.iter().find(|p| p.name == "Numbers").unwrap();

        assert_eq!(numbers.match_count, 2);
        assert_eq!(numbers.non_match_count, 1);
        assert_eq!(numbers.avg_views_with, 1000);
        assert_eq!(numbers.avg_views_without, 100);
        assert_eq!(numbers.lift, 900);
        assert_eq!(numbers.direction, PatternDirection::Positive);
        assert!(!numbers.is_reliable());
    }

    #[test]
    fn test_lift_sign_and_direction() {
        assert_eq!(compute_lift(100, 0), 0);
        assert_eq!(compute_lift(80, 100), -20);
        assert_eq!(compute_lift(115, 100), 15);
        assert_eq!(PatternDirection::from_lift(15), PatternDirection::Neutral);
        assert_eq!(PatternDirection::from_lift(16), PatternDirection::Positive);
        assert_eq!(PatternDirection::from_lift(-16), PatternDirection::Negative);
        assert!(compute_lift(101, 100) > 0);
        assert!(compute_lift(99, 100) < 0);
    }

    #[test]
    fn test_pronoun_rule_is_case_sensitive() {
        let personal = rule("Personal framing (I/My)");
        assert!(personal.matches("Why I Quit My Job"));
        assert!(personal.matches("I'm back"));
        assert!(!personal.matches("my first video"));
        assert!(!personal.matches("in the middle"));
    }

    #[test]
    fn test_vocabulary_rules_ignore_case() {
        assert!(rule("Strong emotion words").matches("The BRUTAL truth"));
        assert!(rule("Negative framing").matches("Don't buy this"));
        assert!(rule("Promise language").matches("The Ultimate Guide"));
        assert!(rule("How to / How I").matches("HOW I made it"));
        assert!(!rule("How to / How I").matches("Showtime"));
        // Whole words only
        assert!(!rule("Strong emotion words").matches("hardware review"));
    }

    #[test]
    fn test_structural_rules() {
        assert!(rule("ALL CAPS words").matches("This is HUGE"));
        assert!(!rule("ALL CAPS words").matches("AI news"));
        assert!(rule("Listicle (starts with number)").matches("7 habits of success"));
        assert!(!rule("Listicle (starts with number)").matches("Top 7 habits"));
        assert!(rule("Brackets/parentheses").matches("Vlog (part 2)"));
        assert!(rule("Brackets/parentheses").matches("[LIVE] stream"));
        assert!(rule("Colon/dash separator").matches("Rust: the book"));
        assert!(rule("Colon/dash separator").matches("Rust - the book"));
        assert!(rule("Colon/dash separator").matches("Rust \u{2014} the book"));
        assert!(!rule("Colon/dash separator").matches("well-known"));
        assert!(rule("Question marks").matches("Is it worth it?"));
    }

    #[test]
    fn test_word_boundaries_are_ascii() {
        assert!(rule("Negative framing").matches("La problemática del agua"));
        assert!(rule("ALL CAPS words").matches("RÉSULTATS du mois"));
        assert!(!rule("Negative framing").matches("problematic"));
        // Non-ASCII letters do not fold onto ASCII vocabulary
        assert!(!rule("Promise language").matches("\u{17f}ecret"));
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&PatternDirection::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
    }
}
