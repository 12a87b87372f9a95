//! Form settings
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you! Your submission has been received.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub submit_button_text: String,
    pub success_message: String,
    pub redirect_url: Option<String>,
    pub captcha_enabled: bool,
    pub notification_email: Option<String>,
    pub theme: FormTheme,
    /// Flat on the wire: `showLabels`, `showRequiredIndicator`, `showHelpText`
    #[serde(flatten)]
    pub display: DisplaySettings,
    /// Flat on the wire: `requiredMessage`, `emailMessage`, ...
    #[serde(flatten)]
    pub messages: ValidationMessages,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_button_text: DEFAULT_SUBMIT_TEXT.into(),
            success_message: DEFAULT_SUCCESS_MESSAGE.into(),
            redirect_url: None,
            captcha_enabled: false,
            notification_email: None,
            theme: FormTheme::default(),
            display: DisplaySettings::default(),
            messages: ValidationMessages::default(),
        }
    }
}

/// Either a named palette or custom CSS/JS supplied by the tenant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FormTheme {
    Palette { name: ThemePalette },
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        css: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        js: Option<String>,
    },
}

impl Default for FormTheme {
    fn default() -> Self {
        FormTheme::Palette { name: ThemePalette::Light }
    }
}

impl FormTheme {
    /// Value used for `data-theme` attributes
    pub fn data_attribute(&self) -> &str {
        match self {
            FormTheme::Palette { name } => name.as_str(),
            FormTheme::Custom { .. } => "custom",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePalette {
    #[default]
    Light,
    Dark,
    Minimal,
    Modern,
}

impl ThemePalette {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePalette::Light => "light",
            ThemePalette::Dark => "dark",
            ThemePalette::Minimal => "minimal",
            ThemePalette::Modern => "modern",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub show_labels: bool,
    pub show_required_indicator: bool,
    pub show_help_text: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_required_indicator: true,
            show_help_text: true,
        }
    }
}

/// Validation message overrides; `None` falls back to the built-in text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
    #[serde(rename = "requiredMessage", skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(rename = "emailMessage", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "numberMessage", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "phoneMessage", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "dateMessage", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "optionMessage", skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(rename = "ratingMessage", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// Shallow merge into [`FormSettings`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub submit_button_text: Option<String>,
    #[serde(default)]
    pub success_message: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub redirect_url: Option<Option<String>>,
    #[serde(default)]
    pub captcha_enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_email: Option<Option<String>>,
    #[serde(default)]
    pub theme: Option<FormTheme>,
    #[serde(default)]
    pub display: Option<DisplaySettings>,
    #[serde(default)]
    pub messages: Option<ValidationMessages>,
}

impl FormSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(text) = patch.submit_button_text {
            self.submit_button_text = text;
        }
        if let Some(message) = patch.success_message {
            self.success_message = message;
        }
        if let Some(url) = patch.redirect_url {
            self.redirect_url = url;
        }
        if let Some(enabled) = patch.captcha_enabled {
            self.captcha_enabled = enabled;
        }
        if let Some(email) = patch.notification_email {
            self.notification_email = email;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(display) = patch.display {
            self.display = display;
        }
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FormSettings::default();
        assert_eq!(settings.submit_button_text, "Submit");
        assert!(settings.display.show_required_indicator);
        assert_eq!(settings.theme.data_attribute(), "light");
    }

    #[test]
    fn test_shallow_merge_keeps_untouched_values() {
        let mut settings = FormSettings::default();
        settings.apply(SettingsPatch {
            submit_button_text: Some("Send".into()),
            redirect_url: Some(Some("https://example.com/thanks".into())),
            ..Default::default()
        });
        assert_eq!(settings.submit_button_text, "Send");
        assert_eq!(settings.redirect_url.as_deref(), Some("https://example.com/thanks"));
        assert_eq!(settings.success_message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_null_in_patch_clears_redirect() {
        let mut settings = FormSettings {
            redirect_url: Some("https://example.com/thanks".into()),
            notification_email: Some("ops@example.com".into()),
            ..Default::default()
        };
        let patch: SettingsPatch = serde_json::from_str(r#"{"redirectUrl": null}"#).unwrap();
        settings.apply(patch);
        assert_eq!(settings.redirect_url, None);
        assert_eq!(settings.notification_email.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: FormSettings = serde_json::from_str(
            r#"{"captchaEnabled": true, "requiredMessage": "Needed", "theme": {"kind": "custom", "css": ".f{}"}}"#,
        )
        .unwrap();
        assert!(settings.captcha_enabled);
        assert_eq!(settings.messages.required.as_deref(), Some("Needed"));
        assert_eq!(settings.theme.data_attribute(), "custom");
        assert_eq!(settings.submit_button_text, "Submit");
        assert!(settings.display.show_labels);
    }

    #[test]
    fn test_flat_display_and_message_keys() {
        let settings: FormSettings = serde_json::from_str(
            r#"{"requiredMessage": "Please fill this in", "emailMessage": "Bad address", "showRequiredIndicator": false}"#,
        )
        .unwrap();
        assert_eq!(settings.messages.required.as_deref(), Some("Please fill this in"));
        assert_eq!(settings.messages.email.as_deref(), Some("Bad address"));
        assert!(!settings.display.show_required_indicator);
        assert!(settings.display.show_help_text);

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["requiredMessage"], "Please fill this in");
        assert_eq!(json["showRequiredIndicator"], false);
        assert!(json.get("messages").is_none());
        assert!(json.get("numberMessage").is_none());
    }
}
