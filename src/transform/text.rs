use once_cell::sync::Lazy;
use regex::Regex;

static CASE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:NO\.?\s*)?(\d+\s+OF\s+\d{2,4})\b").expect("case reference pattern")
});

static COURT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Z][A-Z '&.-]*?\bCOURT\b(?:\s+OF\s+JUSTICE)?").expect("court name pattern")
});

// Words left lower case inside a county name
const MINOR_WORDS: &[&str] = &["and", "of", "the", "on", "upon", "in", "le", "by"];

/// The parts of a legacy amendment annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmendmentInfo {
    pub additional_information: String,
    pub reference: Option<String>,
    pub court: Option<String>,
}

/// Free-text rules applied while building registrations
pub trait TextRules: Send + Sync {
    /// Split a legacy amendment annotation into court, case reference and the rest
    fn parse_amendment_info(&self, text: &str) -> AmendmentInfo;

    /// Canonical spelling of a county name
    fn reformat_county(&self, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextRules;

impl TextRules for DefaultTextRules {
    fn parse_amendment_info(&self, text: &str) -> AmendmentInfo {
        let text = text.trim();
        let mut rest = text.to_string();

        let reference = CASE_REFERENCE.captures(text).map(|caps| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            rest = rest.replacen(whole, " ", 1);
            collapse_whitespace(&caps[1]).to_uppercase()
        });

        let court = COURT_NAME.find(&rest).map(|m| m.as_str().trim().to_string());
        if let Some(court) = &court {
            rest = rest.replacen(court.as_str(), " ", 1);
        }

        AmendmentInfo {
            additional_information: collapse_whitespace(&rest),
            reference,
            court,
        }
    }

    fn reformat_county(&self, text: &str) -> String {
        text.split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                let word = if word == "&" { "and" } else { word };
                word.split('-')
                    .enumerate()
                    .map(|(j, part)| {
                        let lower = part.to_lowercase();
                        if (i > 0 || j > 0) && MINOR_WORDS.contains(&lower.as_str()) {
                            lower
                        } else {
                            capitalize(&lower)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
