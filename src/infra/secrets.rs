use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 6] = [
    "password",
    "token",
    "bearer",
    "authorization",
    "secret",
    "access_token",
];

pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short, non-reversible description of a token for logs.
pub fn describe_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}… ({} chars)", token.chars().count())
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "roomchat panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("roomchat panic: {}", scrubbed);
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    if SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || looks_like_jwt(chunk)
    {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

/// Three dot-separated base64url segments, the shape of a bearer JWT.
fn looks_like_jwt(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| ch == '"' || ch == '\'' || ch == ',');
    let segments: Vec<_> = cleaned.split('.').collect();

    segments.len() == 3
        && segments.iter().all(|segment| {
            segment.len() >= 4
                && segment
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_text_scrubs_sensitive_fragments() {
        let input = "login failed password=hunter22 with eyJhbGciOi.eyJzdWIiOi.c2lnbmF0dXJl now";
        let output = redact_text(input);

        assert!(!output.contains("hunter22"));
        assert!(!output.contains("eyJhbGciOi"));
        assert!(output.contains("[REDACTED]"));
        assert!(output.starts_with("login failed"));
    }

    #[test]
    fn ordinary_dotted_words_are_kept() {
        assert_eq!(redact_text("see v1.2.3 notes"), "see v1.2.3 notes");
    }

    #[test]
    fn describe_token_reveals_only_a_prefix() {
        let description = describe_token("abcdefghijkl");

        assert_eq!(description, "abcd… (12 chars)");
    }
}
