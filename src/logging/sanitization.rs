use regex::Regex;
use std::sync::OnceLock;

/// Patterns masked out of audit and diagnostic lines
pub struct SanitizationPatterns {
    email: Regex,
    bearer_token: Regex,
    password_field: Regex,
}

static PATTERNS: OnceLock<SanitizationPatterns> = OnceLock::new();

pub fn get_patterns() -> &'static SanitizationPatterns {
    PATTERNS.get_or_init(|| SanitizationPatterns {
        // Keep the domain visible
        email: Regex::new(r"\b([a-zA-Z0-9._%+-]+)@([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})\b")
            .expect("Valid email pattern - compile time constant"),
        bearer_token: Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.]+")
            .expect("Valid bearer pattern - compile time constant"),
        password_field: Regex::new(r"(?i)(password|passwd|pwd)\s*[:=]\s*\S+")
            .expect("Valid password pattern - compile time constant"),
    })
}

/// Mask sensitive values in a log message.
///
/// Predicate reasons often echo user identifiers back, so every audit line
/// passes through here before it is written:
/// - e-mail addresses become `***@domain`
/// - bearer tokens become `Bearer [REDACTED]`
/// - password assignments become `field=[REDACTED]`
pub fn sanitize_log_message(message: &str) -> String {
    let patterns = get_patterns();

    let result = patterns.email.replace_all(message, "***@$2");
    let result = patterns.bearer_token.replace_all(&result, "Bearer [REDACTED]");
    let result = patterns.password_field.replace_all(&result, "$1=[REDACTED]");

    result.into_owned()
}
