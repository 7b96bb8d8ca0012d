//! Login and registration form state with inline validation.

use std::path::{Path, PathBuf};

use super::text_input_state::TextInputState;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub credentials: Credentials,
    pub avatar: Option<PathBuf>,
}

/// Per-field validation messages, rendered under each field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.avatar.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub username: TextInputState,
    pub password: TextInputState,
    focus: LoginField,
    errors: FieldErrors,
    pending: bool,
}

impl LoginForm {
    pub fn focus(&self) -> LoginField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInputState {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Validates the fields, storing inline errors on failure.
    pub fn validate(&mut self) -> Option<Credentials> {
        let mut errors = FieldErrors::default();
        let username = self.username.text().trim();
        if username.is_empty() {
            errors.username = Some(required("username"));
        }
        if self.password.is_empty() {
            errors.password = Some(required("password"));
        }

        let valid = errors.is_empty();
        self.errors = errors;

        valid.then(|| Credentials {
            username: username.to_owned(),
            password: self.password.text().to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Username,
    Password,
    Avatar,
}

/// Shown once the avatar path points at a readable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarPreview {
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterForm {
    pub username: TextInputState,
    pub password: TextInputState,
    pub avatar_path: TextInputState,
    focus: RegisterField,
    errors: FieldErrors,
    pending: bool,
    preview: Option<AvatarPreview>,
}

impl RegisterForm {
    pub fn focus(&self) -> RegisterField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            RegisterField::Username => RegisterField::Password,
            RegisterField::Password => RegisterField::Avatar,
            RegisterField::Avatar => RegisterField::Username,
        };
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInputState {
        match self.focus {
            RegisterField::Username => &mut self.username,
            RegisterField::Password => &mut self.password,
            RegisterField::Avatar => &mut self.avatar_path,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn preview(&self) -> Option<&AvatarPreview> {
        self.preview.as_ref()
    }

    /// Re-reads the avatar file metadata after the path changed.
    pub fn refresh_preview(&mut self) {
        self.preview = avatar_path(&self.avatar_path).and_then(|path| inspect_avatar(&path));
    }

    pub fn validate(&mut self) -> Option<Registration> {
        let mut errors = FieldErrors::default();
        let username = self.username.text().trim();
        if username.is_empty() {
            errors.username = Some(required("username"));
        }

        let password_len = self.password.text().chars().count();
        if password_len == 0 {
            errors.password = Some(required("password"));
        } else if password_len < MIN_PASSWORD_LENGTH {
            errors.password = Some(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }

        let avatar = avatar_path(&self.avatar_path);
        if let Some(path) = avatar.as_deref() {
            if inspect_avatar(path).is_none() {
                errors.avatar = Some(format!("avatar file not found: {}", path.display()));
            }
        }

        let valid = errors.is_empty();
        self.errors = errors;

        valid.then(|| Registration {
            credentials: Credentials {
                username: username.to_owned(),
                password: self.password.text().to_owned(),
            },
            avatar,
        })
    }
}

fn required(field: &str) -> String {
    format!("{field} is a required field")
}

fn avatar_path(input: &TextInputState) -> Option<PathBuf> {
    let raw = input.text().trim();
    (!raw.is_empty()).then(|| PathBuf::from(raw))
}

fn inspect_avatar(path: &Path) -> Option<AvatarPreview> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(AvatarPreview {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn type_into(input: &mut TextInputState, text: &str) {
        input.insert_str(text);
    }

    #[test]
    fn login_requires_both_fields() {
        let mut form = LoginForm::default();

        assert_eq!(form.validate(), None);
        assert_eq!(
            form.errors().username.as_deref(),
            Some("username is a required field")
        );
        assert_eq!(
            form.errors().password.as_deref(),
            Some("password is a required field")
        );
    }

    #[test]
    fn login_returns_trimmed_username_and_raw_password() {
        let mut form = LoginForm::default();
        type_into(&mut form.username, " alice ");
        type_into(&mut form.password, "secret1");

        let credentials = form.validate().expect("form should be valid");

        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret1");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn login_focus_cycles_between_fields() {
        let mut form = LoginForm::default();
        form.focused_input_mut().insert_str("alice");
        form.focus_next();
        form.focused_input_mut().insert_str("pw");

        assert_eq!(form.username.text(), "alice");
        assert_eq!(form.password.text(), "pw");

        form.focus_next();
        assert_eq!(form.focus(), LoginField::Username);
    }

    #[test]
    fn register_enforces_minimum_password_length() {
        let mut form = RegisterForm::default();
        type_into(&mut form.username, "alice");
        type_into(&mut form.password, "12345");

        assert_eq!(form.validate(), None);
        assert_eq!(
            form.errors().password.as_deref(),
            Some("password must be at least 6 characters")
        );
        assert!(form.errors().username.is_none());
    }

    #[test]
    fn register_without_avatar_is_valid() {
        let mut form = RegisterForm::default();
        type_into(&mut form.username, "alice");
        type_into(&mut form.password, "secret1");

        let registration = form.validate().expect("form should be valid");

        assert_eq!(registration.credentials.username, "alice");
        assert_eq!(registration.avatar, None);
    }

    #[test]
    fn register_rejects_missing_avatar_file() {
        let mut form = RegisterForm::default();
        type_into(&mut form.username, "alice");
        type_into(&mut form.password, "secret1");
        type_into(&mut form.avatar_path, "/definitely/not/here.png");

        assert_eq!(form.validate(), None);
        assert!(form
            .errors()
            .avatar
            .as_deref()
            .is_some_and(|error| error.contains("not found")));
    }

    #[test]
    fn register_preview_reports_existing_avatar_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        file.write_all(b"fake-png").expect("temp file should be writable");

        let mut form = RegisterForm::default();
        type_into(&mut form.username, "alice");
        type_into(&mut form.password, "secret1");
        type_into(&mut form.avatar_path, &file.path().to_string_lossy());
        form.refresh_preview();

        let preview = form.preview().expect("preview should be available");
        assert_eq!(preview.size_bytes, 8);

        let registration = form.validate().expect("form should be valid");
        assert_eq!(registration.avatar.as_deref(), Some(file.path()));
    }
}
