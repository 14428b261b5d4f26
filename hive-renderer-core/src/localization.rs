use crate::error::RenderError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// User-facing strings the renderer injects into content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizationOptions {
    pub phishing_warning: String,
    pub external_link: String,
    pub no_image: String,
    pub account_name_wrong_length: String,
    pub account_name_bad_actor: String,
    pub account_name_wrong_segment: String,
}

impl Default for LocalizationOptions {
    fn default() -> Self {
        Self {
            phishing_warning: "Link expanded to plain text; beware of a potential phishing attempt"
                .to_string(),
            external_link: "This link will take you away from example.com".to_string(),
            no_image: "Images not allowed".to_string(),
            account_name_wrong_length: "Account name should be between 3 and 16 characters long"
                .to_string(),
            account_name_bad_actor: "This account is on a bad actor list".to_string(),
            account_name_wrong_segment: "This account name contains a bad segment".to_string(),
        }
    }
}

impl LocalizationOptions {
    /// Every message must contain something other than whitespace.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("phishingWarning", &self.phishing_warning),
            ("externalLink", &self.external_link),
            ("noImage", &self.no_image),
            ("accountNameWrongLength", &self.account_name_wrong_length),
            ("accountNameBadActor", &self.account_name_bad_actor),
            ("accountNameWrongSegment", &self.account_name_wrong_segment),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(RenderError::Localization(format!(
                    "{} should be a non-empty string",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let localization: Self = serde_json::from_str(json)
            .map_err(|e| RenderError::Localization(format!("JSON parse error: {}", e)))?;
        localization.validate()?;
        Ok(localization)
    }

    pub fn with_phishing_warning(mut self, text: impl Into<String>) -> Self {
        self.phishing_warning = text.into();
        self
    }

    pub fn with_external_link(mut self, text: impl Into<String>) -> Self {
        self.external_link = text.into();
        self
    }

    pub fn with_no_image(mut self, text: impl Into<String>) -> Self {
        self.no_image = text.into();
        self
    }
}
