//! Style Resolver: maps a template identifier to its typographic bundle.
//!
//! The template set is closed. Unrecognized identifiers fall back to
//! `Template::Professional`, so `resolve_style` is total over its input.

use crate::layout::font_metrics::FontFamily;

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit RGB color. Converted to PDF's 0.0–1.0 components at serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn components(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

/// Body text color shared by every template.
pub const BODY_COLOR: Rgb = Rgb(51, 51, 51);

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

/// Every template any export path has ever offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Professional,
    Modern,
    Classic,
    Minimal,
    Creative,
    Executive,
}

impl Template {
    #[cfg(test)]
    pub const ALL: [Template; 6] = [
        Template::Professional,
        Template::Modern,
        Template::Classic,
        Template::Minimal,
        Template::Creative,
        Template::Executive,
    ];

    /// Parses a stored template identifier. Case-insensitive, surrounding whitespace ignored.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "professional" => Some(Template::Professional),
            "modern" => Some(Template::Modern),
            "classic" => Some(Template::Classic),
            "minimal" => Some(Template::Minimal),
            "creative" => Some(Template::Creative),
            "executive" => Some(Template::Executive),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Template::Professional => "professional",
            Template::Modern => "modern",
            Template::Classic => "classic",
            Template::Minimal => "minimal",
            Template::Creative => "creative",
            Template::Executive => "executive",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style bundle
// ────────────────────────────────────────────────────────────────────────────

/// Immutable typographic constants for one template. Sizes are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleBundle {
    pub template: Template,
    pub header_size: f32,
    pub section_header_size: f32,
    pub text_size: f32,
    pub header_color: Rgb,
    pub accent_color: Rgb,
    pub font_family: FontFamily,
    /// Vertical distance the cursor moves after each written line.
    pub line_spacing: f32,
}

/// Returns the bundle for a template.
pub fn style_for(template: Template) -> StyleBundle {
    match template {
        Template::Professional => StyleBundle {
            template,
            header_size: 22.0,
            section_header_size: 13.0,
            text_size: 10.0,
            header_color: Rgb(44, 62, 80),
            accent_color: Rgb(41, 128, 185),
            font_family: FontFamily::Helvetica,
            line_spacing: 14.0,
        },
        Template::Modern => StyleBundle {
            template,
            header_size: 24.0,
            section_header_size: 14.0,
            text_size: 10.0,
            header_color: Rgb(33, 33, 33),
            accent_color: Rgb(0, 150, 136),
            font_family: FontFamily::Helvetica,
            line_spacing: 14.5,
        },
        Template::Classic => StyleBundle {
            template,
            header_size: 22.0,
            section_header_size: 13.0,
            text_size: 11.0,
            header_color: Rgb::BLACK,
            accent_color: Rgb(80, 80, 80),
            font_family: FontFamily::Times,
            line_spacing: 15.0,
        },
        Template::Minimal => StyleBundle {
            template,
            header_size: 20.0,
            section_header_size: 12.0,
            text_size: 10.0,
            header_color: Rgb(40, 40, 40),
            accent_color: Rgb(120, 120, 120),
            font_family: FontFamily::Helvetica,
            line_spacing: 13.5,
        },
        Template::Creative => StyleBundle {
            template,
            header_size: 26.0,
            section_header_size: 14.0,
            text_size: 10.0,
            header_color: Rgb(74, 20, 140),
            accent_color: Rgb(233, 30, 99),
            font_family: FontFamily::Helvetica,
            line_spacing: 14.5,
        },
        Template::Executive => StyleBundle {
            template,
            header_size: 24.0,
            section_header_size: 14.0,
            text_size: 11.0,
            header_color: Rgb(26, 35, 126),
            accent_color: Rgb(183, 149, 11),
            font_family: FontFamily::Times,
            line_spacing: 15.5,
        },
    }
}

/// Resolves a raw template identifier, falling back to the professional bundle.
pub fn resolve_style(template_id: &str) -> StyleBundle {
    style_for(Template::from_id(template_id).unwrap_or(Template::Professional))
}
