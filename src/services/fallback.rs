// src/services/fallback.rs
//! Canned replies used when the answering endpoint cannot be reached.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const GREETING_REPLY: &str =
    "Hello! I'm the iSystem Development support bot. How can I help you today?";
pub const SUPPORT_REPLY: &str = concat!(
    "For immediate assistance, please email us at support@isystem.dev ",
    "or check our FAQ section above."
);
pub const HOURS_REPLY: &str = "Our business hours are Monday to Friday, 9:00 AM to 6:00 PM (EST).";
pub const SERVICES_REPLY: &str = concat!(
    "We provide custom software development, cloud solutions, ",
    "infrastructure management, and technical consulting."
);
pub const CONTACT_REPLY: &str =
    "You can reach us at support@isystem.dev or use this chat for immediate assistance.";
pub const DEFAULT_REPLY: &str = concat!(
    "I understand your question. For detailed information, please check our FAQ section ",
    "or contact our support team at support@isystem.dev."
);

/// Shown instead of a canned reply when fallback is disabled.
pub const APOLOGY_REPLY: &str = concat!(
    "Sorry, I'm having trouble connecting to the server. ",
    "Please try again later or contact support@isystem.dev."
);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackCategory {
    Greeting,
    Support,
    Hours,
    Services,
    Contact,
    Default,
}

impl FallbackCategory {
    pub fn reply(self) -> &'static str {
        match self {
            FallbackCategory::Greeting => GREETING_REPLY,
            FallbackCategory::Support => SUPPORT_REPLY,
            FallbackCategory::Hours => HOURS_REPLY,
            FallbackCategory::Services => SERVICES_REPLY,
            FallbackCategory::Contact => CONTACT_REPLY,
            FallbackCategory::Default => DEFAULT_REPLY,
        }
    }
}

// Order is priority: the first matching row wins.
static FALLBACK_TABLE: LazyLock<Vec<(FallbackCategory, Regex)>> = LazyLock::new(|| {
    [
        (FallbackCategory::Greeting, r"hello|hi|hey|greetings"),
        (FallbackCategory::Support, r"support|help|assistance"),
        (FallbackCategory::Hours, r"hours|time|when|available"),
        (FallbackCategory::Services, r"service|what do you|what can"),
        (FallbackCategory::Contact, r"contact|email|phone|reach"),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        // Patterns are literals above; a failure here is a programming error.
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("bad fallback pattern {pattern}: {e}"));
        (category, regex)
    })
    .collect()
});

pub fn classify(text: &str) -> FallbackCategory {
    let lower = text.to_lowercase();
    FALLBACK_TABLE
        .iter()
        .find(|(_, regex)| regex.is_match(&lower))
        .map(|(category, _)| *category)
        .unwrap_or(FallbackCategory::Default)
}

/// Total: every input maps to some canned reply.
pub fn resolve(text: &str) -> &'static str {
    classify(text).reply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_from_the_widget() {
        assert_eq!(resolve("Hello there"), GREETING_REPLY);
        assert_eq!(resolve("what are your hours?"), HOURS_REPLY);
        assert_eq!(resolve("asdkjf"), DEFAULT_REPLY);
    }

    #[test]
    fn priority_order_is_preserved() {
        // "hey" (greeting) beats "help" (support)
        assert_eq!(classify("hey, I need help"), FallbackCategory::Greeting);
        // "help" (support) beats "available" (hours)
        assert_eq!(classify("is help available"), FallbackCategory::Support);
        // "when" (hours) beats "email" (contact)
        assert_eq!(classify("when do you answer email"), FallbackCategory::Hours);
    }

    #[test]
    fn empty_input_gets_default() {
        assert_eq!(classify(""), FallbackCategory::Default);
    }
}
