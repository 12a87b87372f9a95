//! Embed snippets
//!
//! Markup a site owner pastes into their page to host a published form. Generation is pure
//! text; the widget script does the rest at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EmbedConfig;
use crate::domain::aggregates::FormDefinition;

/// Where the widget mounts on the host page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedPosition {
    #[default]
    Inline,
    Popup,
    SlideIn,
}

impl EmbedPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedPosition::Inline => "inline",
            EmbedPosition::Popup => "popup",
            EmbedPosition::SlideIn => "slide-in",
        }
    }
}

impl fmt::Display for EmbedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [EmbedPosition::Inline, EmbedPosition::Popup, EmbedPosition::SlideIn]
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown embed position: {s}"))
    }
}

/// Script tag plus mount point
pub fn script_snippet(form: &FormDefinition, config: &EmbedConfig) -> String {
    let base = config.widget_base_url.trim_end_matches('/');
    let id = escape_attr(form.id.as_str());
    format!(
        "<script src=\"{base}/widgets/forms/{id}.js\" async></script>\n\
         <div id=\"bizhub-form-{id}\" data-form-id=\"{id}\" data-theme=\"{theme}\" data-position=\"{position}\"></div>",
        base = escape_attr(base),
        theme = escape_attr(form.settings.theme.data_attribute()),
        position = config.default_position,
    )
}

/// Self-contained iframe pointing at the hosted form page
pub fn iframe_snippet(form: &FormDefinition, config: &EmbedConfig) -> String {
    let base = config.widget_base_url.trim_end_matches('/');
    format!(
        "<iframe src=\"{base}/forms/{id}\" title=\"{title}\" width=\"100%\" height=\"{height}\" frameborder=\"0\"></iframe>",
        base = escape_attr(base),
        id = escape_attr(form.id.as_str()),
        title = escape_attr(&form.name),
        height = config.iframe_height,
    )
}

fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FormId, FormTheme, ThemePalette};

    fn form() -> FormDefinition {
        let mut form = FormDefinition::create("Contact \"us\"");
        form.id = FormId::from_string("form_42");
        form.settings.theme = FormTheme::Palette {
            name: ThemePalette::Dark,
        };
        form
    }

    #[test]
    fn test_script_snippet() {
        let config = EmbedConfig {
            widget_base_url: "https://cdn.bizhub.test/".into(),
            ..Default::default()
        };
        let snippet = script_snippet(&form(), &config);
        assert!(snippet.starts_with("<script src=\"https://cdn.bizhub.test/widgets/forms/form_42.js\" async></script>"));
        assert!(snippet.contains("<div id=\"bizhub-form-form_42\" data-form-id=\"form_42\""));
        assert!(snippet.contains("data-theme=\"dark\""));
        assert!(snippet.contains("data-position=\"inline\""));
    }

    #[test]
    fn test_iframe_escapes_title() {
        let config = EmbedConfig {
            widget_base_url: "https://cdn.bizhub.test".into(),
            default_position: EmbedPosition::Popup,
            iframe_height: 480,
        };
        let snippet = iframe_snippet(&form(), &config);
        assert!(snippet.contains("src=\"https://cdn.bizhub.test/forms/form_42\""));
        assert!(snippet.contains("title=\"Contact &quot;us&quot;\""));
        assert!(snippet.contains("height=\"480\""));
    }
}
