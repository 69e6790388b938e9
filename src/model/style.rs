//! Per-role typography settings.

use serde::{Deserialize, Serialize};

use super::BlockRole;

/// Font weight selection; each weight maps to one base font face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular face
    #[default]
    #[serde(alias = "light", alias = "regular")]
    Normal,
    /// Bold face
    Bold,
}

/// Typography configuration read by the synthesizer.
///
/// Sizes are in points before scaling; `font_scale` is a percentage
/// applied to every role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Overall text scale in percent
    pub font_scale: f32,

    /// Title base size
    pub title_font_size: f32,

    /// Heading base size
    pub heading_font_size: f32,

    /// Body (and centered body) base size
    pub body_font_size: f32,

    /// Title weight
    pub title_font_weight: FontWeight,

    /// Heading weight
    pub heading_font_weight: FontWeight,

    /// Body weight
    pub body_font_weight: FontWeight,
}

impl StyleConfig {
    /// Create a style with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set overall scale in percent.
    pub fn with_scale(mut self, percent: f32) -> Self {
        self.font_scale = percent;
        self
    }

    /// Set the base size for a role.
    pub fn with_font_size(mut self, role: BlockRole, size: f32) -> Self {
        match role {
            BlockRole::Title => self.title_font_size = size,
            BlockRole::Heading => self.heading_font_size = size,
            BlockRole::Body | BlockRole::CenteredBody => self.body_font_size = size,
        }
        self
    }

    /// Set the weight for a role.
    pub fn with_font_weight(mut self, role: BlockRole, weight: FontWeight) -> Self {
        match role {
            BlockRole::Title => self.title_font_weight = weight,
            BlockRole::Heading => self.heading_font_weight = weight,
            BlockRole::Body | BlockRole::CenteredBody => self.body_font_weight = weight,
        }
        self
    }

    /// Scale factor as a fraction; non-positive values fall back to the default.
    pub fn scale(&self) -> f32 {
        let percent = if self.font_scale > 0.0 {
            self.font_scale
        } else {
            Self::default().font_scale
        };
        percent / 100.0
    }

    /// Unscaled base size for a role; non-positive values fall back to the default.
    pub fn base_size(&self, role: BlockRole) -> f32 {
        let defaults = Self::default();
        let (size, fallback) = match role {
            BlockRole::Title => (self.title_font_size, defaults.title_font_size),
            BlockRole::Heading => (self.heading_font_size, defaults.heading_font_size),
            BlockRole::Body | BlockRole::CenteredBody => {
                (self.body_font_size, defaults.body_font_size)
            }
        };
        if size > 0.0 {
            size
        } else {
            fallback
        }
    }

    /// Weight for a role.
    pub fn weight(&self, role: BlockRole) -> FontWeight {
        match role {
            BlockRole::Title => self.title_font_weight,
            BlockRole::Heading => self.heading_font_weight,
            BlockRole::Body | BlockRole::CenteredBody => self.body_font_weight,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_scale: 70.0,
            title_font_size: 29.0,
            heading_font_size: 17.0,
            body_font_size: 15.0,
            title_font_weight: FontWeight::Normal,
            heading_font_weight: FontWeight::Normal,
            body_font_weight: FontWeight::Normal,
        }
    }
}
