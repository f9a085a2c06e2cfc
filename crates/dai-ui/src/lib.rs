//! # dai-ui
//!
//! Presentation state derived from `SiteStore` snapshots: the classes and
//! font size applied to `<body>`, and which overlays the page should show.

use askama::Template;
use dai_core::models::{AccessibilityPreferences, Testimonial};
use dai_core::store::SiteStore;
use serde::Serialize;

pub const CLASS_REDUCED_MOTION: &str = "reduced-motion";
pub const CLASS_HIGH_CONTRAST: &str = "high-contrast";

#[derive(Template)]
#[template(source = r#"class="{{ class_list }}" style="font-size: {{ font_size_percent }}%""#, ext = "html")]
pub struct BodyAttrsTemplate<'a> {
    pub class_list: &'a str,
    pub font_size_percent: u32,
}

/// What the accessibility preferences do to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyEffects {
    pub reduced_motion: bool,
    pub high_contrast: bool,
    pub font_size_percent: u32,
}

impl From<&AccessibilityPreferences> for BodyEffects {
    fn from(prefs: &AccessibilityPreferences) -> Self {
        Self {
            reduced_motion: prefs.reduced_motion,
            high_contrast: prefs.high_contrast,
            font_size_percent: (prefs.font_scale * 100.0).round() as u32,
        }
    }
}

impl BodyEffects {
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.reduced_motion {
            classes.push(CLASS_REDUCED_MOTION);
        }
        if self.high_contrast {
            classes.push(CLASS_HIGH_CONTRAST);
        }
        classes
    }

    /// Renders `class="..." style="font-size: N%"` for the body tag.
    pub fn render_attrs(&self) -> askama::Result<String> {
        let class_list = self.classes().join(" ");
        BodyAttrsTemplate {
            class_list: &class_list,
            font_size_percent: self.font_size_percent,
        }
        .render()
    }
}

/// Overlay and section visibility for one render of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChrome {
    pub body: BodyEffects,
    /// Photosensitivity warning modal
    pub consent_prompt_open: bool,
    /// Pending-testimonials panel, only on the admin's own browser
    pub moderation_panel_visible: bool,
    pub pending_count: usize,
    pub testimonials: Vec<Testimonial>,
}

impl PageChrome {
    pub fn from_store(store: &SiteStore) -> Self {
        Self {
            body: BodyEffects::from(&store.preferences()),
            consent_prompt_open: store.consent_prompt_pending(),
            moderation_panel_visible: store.is_admin(),
            pending_count: store.pending().len(),
            testimonials: store.approved().to_vec(),
        }
    }
}
