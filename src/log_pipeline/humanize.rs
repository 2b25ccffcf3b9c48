//! Translation of raw operational log lines into user-facing text.
//!
//! The engine logs terse operational phrases; the status UI shows a friendlier
//! rendition with a severity badge. Translation is a fixed, ordered rule table
//! evaluated first-match-wins. Order matters: the generic error-keyword rule
//! comes last so it cannot shadow the more specific phrases before it.
//!
//! Raw messages may carry a trailing structured payload (a JSON fragment used
//! for diagnostics); it is stripped before matching so it never reaches the
//! user-facing log.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Badge attached to a humanized log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
}

enum Matcher {
    Contains(&'static str),
    Pattern(&'static Regex),
    /// Case-insensitive error/failure keyword check. Always last in the table.
    ErrorKeyword,
}

enum Output {
    Fixed(&'static str),
    RequeryPass,
    RowReserve,
    RowWaitlist,
    ErrorPrefix,
}

struct Rule {
    matcher: Matcher,
    severity: Severity,
    output: Output,
}

lazy_static! {
    static ref TRAILING_PAYLOAD: Regex = Regex::new(r"\s*\{[^}]*\}\s*$").unwrap();
    static ref REQUERY: Regex = Regex::new(r"^Requery (\d+)$").unwrap();
    static ref ROW_RESERVE: Regex = Regex::new(r"^Row (\d+): attempting reservation$").unwrap();
    static ref ROW_WAITLIST: Regex = Regex::new(r"^Row (\d+): applying for the waitlist$").unwrap();
    static ref RULES: Vec<Rule> = vec![
        Rule {
            matcher: Matcher::Contains("Automation started"),
            severity: Severity::Info,
            output: Output::Fixed("Started the automation run."),
        },
        Rule {
            matcher: Matcher::Contains("Navigating to the login page"),
            severity: Severity::Info,
            output: Output::Fixed("Heading to the login page."),
        },
        Rule {
            matcher: Matcher::Contains("Navigating to the schedule page"),
            severity: Severity::Info,
            output: Output::Fixed("Heading to the train schedule page."),
        },
        Rule {
            matcher: Matcher::Contains("Search conditions entered"),
            severity: Severity::Info,
            output: Output::Fixed("Search submitted, watching the results."),
        },
        Rule {
            matcher: Matcher::Pattern(&*REQUERY),
            severity: Severity::Info,
            output: Output::RequeryPass,
        },
        Rule {
            matcher: Matcher::Pattern(&*ROW_RESERVE),
            severity: Severity::Info,
            output: Output::RowReserve,
        },
        Rule {
            matcher: Matcher::Pattern(&*ROW_WAITLIST),
            severity: Severity::Info,
            output: Output::RowWaitlist,
        },
        Rule {
            matcher: Matcher::Contains("Reservation succeeded"),
            severity: Severity::Success,
            output: Output::Fixed("Reservation made! You're on the payment screen."),
        },
        Rule {
            matcher: Matcher::Contains("Waitlist application submitted"),
            severity: Severity::Success,
            output: Output::Fixed("Waitlist spot requested! Check the confirmation."),
        },
        Rule {
            matcher: Matcher::Contains("No results listed"),
            severity: Severity::Warn,
            output: Output::Fixed("No trains listed yet, checking again shortly."),
        },
        Rule {
            matcher: Matcher::Contains("No seats left"),
            severity: Severity::Warn,
            output: Output::Fixed("That train is full right now, moving on..."),
        },
        Rule {
            matcher: Matcher::ErrorKeyword,
            severity: Severity::Error,
            output: Output::ErrorPrefix,
        },
    ];
}

impl Matcher {
    fn matches(&self, msg: &str) -> bool {
        match self {
            Matcher::Contains(needle) => msg.contains(needle),
            Matcher::Pattern(re) => re.is_match(msg),
            Matcher::ErrorKeyword => {
                let lower = msg.to_lowercase();
                lower.contains("error") || lower.contains("fault")
            }
        }
    }
}

impl Rule {
    fn render(&self, msg: &str) -> String {
        match &self.output {
            Output::Fixed(text) => (*text).to_string(),
            Output::RequeryPass => {
                let n = &REQUERY.captures(msg).unwrap()[1];
                format!("Requery pass {} under way.", n)
            }
            Output::RowReserve => {
                let n = &ROW_RESERVE.captures(msg).unwrap()[1];
                format!("Trying to book train {}.", n)
            }
            Output::RowWaitlist => {
                let n = &ROW_WAITLIST.captures(msg).unwrap()[1];
                format!("Trying to join the waitlist for train {}.", n)
            }
            Output::ErrorPrefix => format!("Error: {}", msg),
        }
    }
}

/// Translate a raw log message into `(display text, severity)`.
///
/// Deterministic; unmatched input passes through verbatim as `Info`.
pub fn humanize(raw: &str) -> (String, Severity) {
    let msg = TRAILING_PAYLOAD.replace(raw, "");
    let msg = msg.as_ref();

    for rule in RULES.iter() {
        if rule.matcher.matches(msg) {
            return (rule.render(msg), rule.severity);
        }
    }
    (msg.to_string(), Severity::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapping() {
        let cases = vec![
            (
                "Automation started.",
                "Started the automation run.",
                Severity::Info,
            ),
            (
                "Navigating to the login page...",
                "Heading to the login page.",
                Severity::Info,
            ),
            (
                "Navigating to the schedule page...",
                "Heading to the train schedule page.",
                Severity::Info,
            ),
            (
                "Search conditions entered. Querying...",
                "Search submitted, watching the results.",
                Severity::Info,
            ),
            ("Requery 7", "Requery pass 7 under way.", Severity::Info),
            (
                "Row 2: attempting reservation",
                "Trying to book train 2.",
                Severity::Info,
            ),
            (
                "Row 4: applying for the waitlist",
                "Trying to join the waitlist for train 4.",
                Severity::Info,
            ),
            (
                "Reservation succeeded! Moved to the payment screen.",
                "Reservation made! You're on the payment screen.",
                Severity::Success,
            ),
            (
                "Waitlist application submitted!",
                "Waitlist spot requested! Check the confirmation.",
                Severity::Success,
            ),
            (
                "No results listed. Requerying.",
                "No trains listed yet, checking again shortly.",
                Severity::Warn,
            ),
            (
                "No seats left. Returning to the results.",
                "That train is full right now, moving on...",
                Severity::Warn,
            ),
        ];
        for (raw, expected, severity) in cases {
            assert_eq!(humanize(raw), (expected.to_string(), severity), "{}", raw);
        }
    }

    #[test]
    fn test_error_keyword_rule() {
        let (text, severity) = humanize("Login error: bad credentials");
        assert_eq!(severity, Severity::Error);
        assert_eq!(text, "Error: Login error: bad credentials");

        let (_, severity) = humanize("automation fault during navigation");
        assert_eq!(severity, Severity::Error);
    }

    #[test]
    fn test_specific_rules_shadow_error_keyword() {
        // A requery line should never fall through to the error rule even if
        // the table order were shuffled by accident.
        let (text, severity) = humanize("Requery 3");
        assert_eq!(severity, Severity::Info);
        assert_eq!(text, "Requery pass 3 under way.");
    }

    #[test]
    fn test_passthrough_is_info_and_idempotent() {
        let msg = "Requested time 19:30 mapped to the 18:00 slot.";
        let (text, severity) = humanize(msg);
        assert_eq!(severity, Severity::Info);
        assert_eq!(text, msg);

        // Humanizing already-humanized passthrough text changes nothing.
        let (again, severity2) = humanize(&text);
        assert_eq!(again, text);
        assert_eq!(severity2, severity);
    }

    #[test]
    fn test_trailing_payload_stripped() {
        let (text, severity) = humanize("Automation finished. {\"ok\":true,\"type\":\"reserve\"}");
        assert_eq!(text, "Automation finished.");
        assert_eq!(severity, Severity::Info);
    }

    #[test]
    fn test_payload_strip_happens_before_matching() {
        let (text, severity) = humanize("Requery 2 {\"elapsed\":1234}");
        assert_eq!(text, "Requery pass 2 under way.");
        assert_eq!(severity, Severity::Info);
    }

    #[test]
    fn test_determinism() {
        for _ in 0..3 {
            assert_eq!(humanize("Requery 1"), humanize("Requery 1"));
        }
    }
}
