//! # Domain Models
//!
//! Accessibility preferences, consent state and the testimonial moderation
//! queues. Serialized field names match the local-storage records the site
//! writes.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const FONT_SCALE_MIN: f64 = 0.85;
pub const FONT_SCALE_MAX: f64 = 1.40;
pub const FONT_SCALE_DEFAULT: f64 = 1.0;
/// Increment used by the "A+" / "A-" buttons.
pub const FONT_SCALE_STEP: f64 = 0.05;

/// Avatar shown for testimonials submitted without an image link.
pub const PLACEHOLDER_AVATAR: &str = "/client_placeholder.jpg";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Visitor-controlled display settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityPreferences {
    pub high_contrast: bool,
    pub reduced_motion: bool,
    /// Always within `[FONT_SCALE_MIN, FONT_SCALE_MAX]`
    pub font_scale: f64,
}

impl Default for AccessibilityPreferences {
    fn default() -> Self {
        Self {
            high_contrast: false,
            reduced_motion: false,
            font_scale: FONT_SCALE_DEFAULT,
        }
    }
}

impl AccessibilityPreferences {
    /// Moves the font scale by `delta`, rounded to two decimals and clamped.
    /// Returns false (and changes nothing) for a non-finite delta.
    pub fn adjust_font_scale(&mut self, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.font_scale = round2(self.font_scale + delta).clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
        true
    }

    /// Repairs a record read from storage: out-of-range or non-finite scales
    /// are pulled back into range.
    pub fn sanitized(mut self) -> Self {
        self.font_scale = if self.font_scale.is_finite() {
            round2(self.font_scale).clamp(FONT_SCALE_MIN, FONT_SCALE_MAX)
        } else {
            FONT_SCALE_DEFAULT
        };
        self
    }
}

/// One-time acknowledgment of the photosensitivity warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentState {
    pub epilepsy_acknowledged: bool,
}

/// Trims like the browser's `String.prototype.trim`, which also strips a
/// byte-order mark.
fn trim_input(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

fn placeholder_avatar() -> String {
    PLACEHOLDER_AVATAR.to_string()
}

/// A visitor quote. Equality is by content; there is no id, position in its
/// queue is the only handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub text: String,
    #[serde(default = "placeholder_avatar")]
    pub avatar: String,
}

impl Testimonial {
    /// Builds a submission from raw form input. All fields are trimmed, an
    /// empty avatar falls back to the placeholder.
    pub fn from_submission(name: &str, text: &str, avatar: Option<&str>) -> Result<Self> {
        let name = trim_input(name);
        let text = trim_input(text);
        if name.is_empty() {
            return Err(AppError::Validation("testimonial name is empty".into()));
        }
        if text.is_empty() {
            return Err(AppError::Validation("testimonial text is empty".into()));
        }
        let avatar = match avatar.map(trim_input) {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => placeholder_avatar(),
        };
        Ok(Self {
            name: name.to_string(),
            text: text.to_string(),
            avatar,
        })
    }

    fn seed(name: &str, text: &str, avatar: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            avatar: avatar.to_string(),
        }
    }
}

/// Built-in approved testimonials shown before anything was persisted.
pub fn seed_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial::seed(
            "מור & ניר",
            "הסרטון הפך את החתונה שלנו לאירוע בלתי נשכח! כולם דיברו על זה.",
            "/client1.jpg",
        ),
        Testimonial::seed(
            "תאיר & לירן",
            "האנרגיה והאווירה שדור יצר עם הסרטון פשוט הרימו את הרחבה!",
            "/client2.jpg",
        ),
        Testimonial::seed(
            "עדן & דקל",
            "השירות אישי, מהיר ואיכותי – מומלץ לכל מי שרוצה אירוע שיזכרו.",
            "/client3.jpg",
        ),
    ]
}

/// Pending/approved partition of testimonials. An entry lives in exactly one
/// of the two lists; moves go through `approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationQueues {
    pub approved: Vec<Testimonial>,
    pub pending: Vec<Testimonial>,
}

impl Default for ModerationQueues {
    fn default() -> Self {
        Self {
            approved: seed_testimonials(),
            pending: Vec::new(),
        }
    }
}

impl ModerationQueues {
    /// Newest submissions go first.
    pub fn submit(&mut self, item: Testimonial) {
        self.pending.insert(0, item);
    }

    /// Moves `pending[index]` to the front of `approved`.
    pub fn approve(&mut self, index: usize) -> Option<Testimonial> {
        if index >= self.pending.len() {
            return None;
        }
        let item = self.pending.remove(index);
        self.approved.insert(0, item.clone());
        Some(item)
    }

    /// Drops `pending[index]`.
    pub fn reject(&mut self, index: usize) -> Option<Testimonial> {
        if index >= self.pending.len() {
            return None;
        }
        Some(self.pending.remove(index))
    }

    pub fn len(&self) -> usize {
        self.approved.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
