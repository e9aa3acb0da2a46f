//! Section Renderer: lays a Resume Document out onto pages.
//!
//! The header (name, contact line, links) comes first, then each section in
//! `ResumeDocument::section_order`. Every physical line is preceded by a
//! page-break check, so no line is ever drawn below the bottom margin. Blocks
//! are not kept together: a heading can end up alone at the bottom of a page.

use tracing::debug;

use crate::layout::bullets::split_bullets;
use crate::layout::font_metrics::BULLET;
use crate::layout::links::{draw_link, normalize_uri, Align};
use crate::layout::page::{Canvas, PageContent, PageGeometry, TextStyle};
use crate::layout::style::{StyleBundle, BODY_COLOR};
use crate::layout::wrap::wrap_text;
use crate::models::document::{
    format_date, CertificationEntry, EducationEntry, ExperienceEntry, PersonalInfo,
    ProjectEntry, ResumeDocument, SectionKind, TextField,
};

/// Bullet glyph offset from the left content margin.
pub const BULLET_INDENT: f32 = 10.0;
/// Gap between the bullet glyph and its text.
pub const BULLET_TEXT_GAP: f32 = 10.0;
const SECTION_GAP: f32 = 8.0;
const ENTRY_GAP: f32 = 4.0;
const RULE_OFFSET: f32 = 4.0;
const RULE_THICKNESS: f32 = 0.8;
const SECONDARY_GAP: f32 = 12.0;
const SKILL_SEPARATOR: &str = " \u{2022} ";

// ────────────────────────────────────────────────────────────────────────────
// Text styles derived from the bundle
// ────────────────────────────────────────────────────────────────────────────

struct Fonts {
    name: TextStyle,
    heading: TextStyle,
    title: TextStyle,
    body: TextStyle,
}

impl Fonts {
    fn for_style(style: &StyleBundle) -> Self {
        let bold = style.font_family.bold();
        Self {
            name: TextStyle {
                font: bold,
                size: style.header_size,
                color: style.header_color,
            },
            heading: TextStyle {
                font: bold,
                size: style.section_header_size,
                color: style.header_color,
            },
            title: TextStyle {
                font: bold,
                size: style.text_size,
                color: BODY_COLOR,
            },
            body: TextStyle {
                font: style.font_family.regular(),
                size: style.text_size,
                color: BODY_COLOR,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the whole document. Pure: the same input always yields the same pages.
pub fn layout_resume(
    document: &ResumeDocument,
    style: &StyleBundle,
    geometry: &PageGeometry,
) -> Vec<PageContent> {
    let mut canvas = Canvas::new(*geometry, *style);
    let fonts = Fonts::for_style(style);

    if let Some(info) = &document.personal_info {
        render_header(&mut canvas, &fonts, info);
    }

    for kind in document.section_order() {
        let rendered = match kind {
            SectionKind::Summary => render_summary(&mut canvas, &fonts, &document.summary),
            SectionKind::Experience => render_experience(&mut canvas, &fonts, &document.experience),
            SectionKind::Education => render_education(&mut canvas, &fonts, &document.education),
            SectionKind::Skills => render_skills(&mut canvas, &fonts, &document.skills),
            SectionKind::Projects => render_projects(&mut canvas, &fonts, &document.projects),
            SectionKind::Certifications => {
                render_certifications(&mut canvas, &fonts, &document.certifications)
            }
        };
        if !rendered {
            debug!(section = kind.title(), "Section is empty, skipped");
        }
    }

    debug!(pages = canvas.page_count(), "Layout complete");
    canvas.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn render_header(canvas: &mut Canvas, fonts: &Fonts, info: &PersonalInfo) {
    let style = *canvas.style();

    canvas.advance(style.header_size);
    canvas.draw_text_centered(&info.full_name.text(), fonts.name);
    canvas.skip(style.header_size * 0.5);
    canvas.line_feed();

    let contact = [&info.email, &info.phone, &info.location]
        .iter()
        .map(|field| field.text())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    if !contact.is_empty() {
        canvas.advance(style.line_spacing);
        canvas.draw_text_centered(&contact, fonts.body);
        canvas.line_feed();
    }

    for link in [&info.linkedin, &info.website] {
        let text = link.text();
        if text.is_empty() {
            continue;
        }
        canvas.advance(style.line_spacing);
        draw_link(canvas, &text, &normalize_uri(&text), Align::Center);
        canvas.line_feed();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn render_summary(canvas: &mut Canvas, fonts: &Fonts, summary: &TextField) -> bool {
    let text = summary.text();
    if text.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Summary);

    let half_line = canvas.style().line_spacing / 2.0;
    let left = canvas.geometry().content_left();
    for paragraph in text.lines() {
        if paragraph.is_empty() {
            canvas.skip(half_line);
            continue;
        }
        render_wrapped(canvas, paragraph, fonts.body, left);
    }
    true
}

fn render_experience(canvas: &mut Canvas, fonts: &Fonts, entries: &[ExperienceEntry]) -> bool {
    if entries.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Experience);

    for entry in entries {
        render_title_line(canvas, fonts, &entry.title.text(), &entry.duration_text());
        render_sub_line(canvas, fonts, &entry.company.text());
        render_bullets(canvas, fonts, &entry.description);
        canvas.skip(ENTRY_GAP);
    }
    true
}

fn render_education(canvas: &mut Canvas, fonts: &Fonts, entries: &[EducationEntry]) -> bool {
    if entries.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Education);

    for entry in entries {
        render_title_line(canvas, fonts, &entry.degree.text(), &entry.year_text());
        render_sub_line(canvas, fonts, &entry.school.text());
        canvas.skip(ENTRY_GAP);
    }
    true
}

fn render_skills(canvas: &mut Canvas, fonts: &Fonts, skills: &TextField) -> bool {
    let items = skills.items();
    if items.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Skills);

    let line = items.join(SKILL_SEPARATOR);
    let left = canvas.geometry().content_left();
    render_wrapped(canvas, &line, fonts.body, left);
    true
}

fn render_projects(canvas: &mut Canvas, fonts: &Fonts, entries: &[ProjectEntry]) -> bool {
    if entries.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Projects);

    for entry in entries {
        render_title_line(canvas, fonts, &entry.name.text(), "");
        let technologies = entry.technologies.joined();
        if !technologies.is_empty() {
            render_sub_line(canvas, fonts, &format!("Technologies: {technologies}"));
        }
        render_link_line(canvas, &entry.url.text());
        render_bullets(canvas, fonts, &entry.description);
        canvas.skip(ENTRY_GAP);
    }
    true
}

fn render_certifications(
    canvas: &mut Canvas,
    fonts: &Fonts,
    entries: &[CertificationEntry],
) -> bool {
    if entries.is_empty() {
        return false;
    }
    render_heading(canvas, fonts, SectionKind::Certifications);

    for entry in entries {
        let date = format_date(&entry.date.text());
        render_title_line(canvas, fonts, &entry.name.text(), &date);
        render_sub_line(canvas, fonts, &entry.issuer.text());
        render_link_line(canvas, &entry.url.text());
        canvas.skip(ENTRY_GAP);
    }
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Building blocks
// ────────────────────────────────────────────────────────────────────────────

/// Bold colored heading with an accent rule beneath it.
fn render_heading(canvas: &mut Canvas, fonts: &Fonts, kind: SectionKind) {
    let style = *canvas.style();
    let geometry = *canvas.geometry();

    canvas.advance(SECTION_GAP + style.section_header_size + RULE_OFFSET);
    canvas.skip(SECTION_GAP);
    canvas.draw_text(kind.title(), geometry.content_left(), fonts.heading);
    canvas.draw_rule(
        geometry.content_left(),
        geometry.content_right(),
        RULE_OFFSET,
        RULE_THICKNESS,
        style.accent_color,
    );
    canvas.line_feed();
}

/// Bold title with an optional right-aligned secondary field on its first line.
fn render_title_line(canvas: &mut Canvas, fonts: &Fonts, title: &str, secondary: &str) {
    let geometry = *canvas.geometry();
    let line_spacing = canvas.style().line_spacing;
    let reserved = if secondary.is_empty() {
        0.0
    } else {
        fonts.body.width_of(secondary) + SECONDARY_GAP
    };
    let width = (geometry.content_width() - reserved).max(geometry.content_width() / 2.0);

    let mut lines = wrap_text(title, fonts.title, width).into_iter();
    canvas.advance(line_spacing);
    canvas.draw_text_right(secondary, fonts.body);
    canvas.write_line(
        &lines.next().unwrap_or_default(),
        geometry.content_left(),
        fonts.title,
    );
    for line in lines {
        canvas.advance(line_spacing);
        canvas.write_line(&line, geometry.content_left(), fonts.title);
    }
}

fn render_sub_line(canvas: &mut Canvas, fonts: &Fonts, text: &str) {
    let left = canvas.geometry().content_left();
    render_wrapped(canvas, text, fonts.body, left);
}

fn render_link_line(canvas: &mut Canvas, url: &str) {
    if url.is_empty() {
        return;
    }
    let line_spacing = canvas.style().line_spacing;
    canvas.advance(line_spacing);
    draw_link(canvas, url, &normalize_uri(url), Align::Left);
    canvas.line_feed();
}

/// Description bullets, indented, each wrapped line checked for a page break.
fn render_bullets(canvas: &mut Canvas, fonts: &Fonts, description: &TextField) {
    let geometry = *canvas.geometry();
    let line_spacing = canvas.style().line_spacing;
    let glyph_x = geometry.content_left() + BULLET_INDENT;
    let text_x = glyph_x + BULLET_TEXT_GAP;
    let width = geometry.content_right() - text_x;
    let glyph = BULLET.to_string();

    for bullet in split_bullets(description.raw()) {
        for (i, line) in wrap_text(&bullet, fonts.body, width).iter().enumerate() {
            canvas.advance(line_spacing);
            if i == 0 {
                canvas.draw_text(&glyph, glyph_x, fonts.body);
            }
            canvas.write_line(line, text_x, fonts.body);
        }
    }
}

/// Wraps `text` to the space right of `x` and writes every line.
fn render_wrapped(canvas: &mut Canvas, text: &str, style: TextStyle, x: f32) {
    let width = canvas.geometry().content_right() - x;
    let line_spacing = canvas.style().line_spacing;
    for line in wrap_text(text, style, width) {
        canvas.advance(line_spacing);
        canvas.write_line(&line, x, style);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
