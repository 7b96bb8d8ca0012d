//! Avatar reference resolution.
//!
//! A reference can be a full URL, an embedded `data:` URI, or a bare file
//! name stored by the backend's upload handler.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarResolver {
    upload_base: String,
    placeholder_url: String,
}

impl AvatarResolver {
    pub fn new(base_url: &str, upload_path: &str, placeholder_url: &str) -> Self {
        let upload_base = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            upload_path.trim_matches('/')
        );

        Self {
            upload_base,
            placeholder_url: placeholder_url.to_owned(),
        }
    }

    /// Returns a fetchable URL for the avatar of `name`.
    pub fn resolve(&self, name: &str, avatar_ref: Option<&str>) -> String {
        match avatar_ref.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) if is_absolute_reference(value) => value.to_owned(),
            Some(file_name) => format!(
                "{}/{}",
                self.upload_base,
                file_name.trim_start_matches('/')
            ),
            None => format!(
                "{}?name={}&background=random",
                self.placeholder_url,
                urlencoding::encode(name)
            ),
        }
    }
}

fn is_absolute_reference(value: &str) -> bool {
    value.starts_with("http") || value.starts_with("data:")
}

/// Up to two uppercase initials used as the terminal stand-in for an image.
pub fn initials(name: &str) -> String {
    let mut parts = name
        .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-' || ch == '.')
        .filter(|part| !part.is_empty());

    let first = parts.next().and_then(|part| part.chars().next());
    let second = parts.next().and_then(|part| part.chars().next()).or_else(|| {
        name.chars()
            .filter(|ch| ch.is_alphanumeric())
            .nth(1)
    });

    match (first, second) {
        (Some(a), Some(b)) => format!("{}{}", a, b).to_uppercase(),
        (Some(a), None) => a.to_uppercase().to_string(),
        _ => "?".to_owned(),
    }
}
