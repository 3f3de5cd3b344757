use serde::{Deserialize, Serialize};

/// Identity captured from the external sign-in callback.
///
/// Only its presence matters to the access gate; nothing here is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInRecord {
    pub name: String,
    pub email: String,
    pub picture: String,
    pub subject_id: String,
}

impl SignInRecord {
    /// Name to show in the user area: the display name, else the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.picture.is_empty()
            && self.subject_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let record = SignInRecord {
            email: "ada@example.com".into(),
            ..SignInRecord::default()
        };
        assert_eq!(record.display_name(), "ada@example.com");
        assert!(!record.is_empty());
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let record: SignInRecord = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(record.name, "Ada");
        assert!(record.subject_id.is_empty());
    }
}
