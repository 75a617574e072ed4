//! shields.io badge construction for lookup responses

use rebuild_types::Badge;

const LABEL: &str = "Reproducible Builds";
const LABEL_COLOR: &str = "2a2f64";

// Inlined so the badge renders without a second fetch from shields.io.
const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><path fill="#fff" d="M16 2 4 9v14l12 7 12-7V9L16 2zm0 3.4 9 5.2v10.8l-9 5.2-9-5.2V10.6l9-5.2zm0 4.1-5.5 3.2v6.6L16 22.5l5.5-3.2v-6.6L16 9.5z"/></svg>"##;

/// Overall verdict a badge communicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStatus {
    Success,
    Warning,
    Error,
}

impl BadgeStatus {
    fn color(self) -> &'static str {
        match self {
            BadgeStatus::Success => "brightgreen",
            BadgeStatus::Warning => "orangered",
            BadgeStatus::Error => "crimson",
        }
    }
}

/// Build the endpoint badge document for a lookup result.
///
/// The `renovate` theme drops the text label so the badge collapses to the
/// logo and message inside renovate dashboards. Any other theme value gets
/// the default rendering.
pub fn status_badge(message: &str, status: BadgeStatus, theme: &str) -> Badge {
    let label = if theme == "renovate" { "\t" } else { LABEL };

    Badge {
        schema_version: 1,
        label: label.to_string(),
        message: message.to_string(),
        color: status.color().to_string(),
        label_color: LABEL_COLOR.to_string(),
        is_error: status != BadgeStatus::Success,
        logo_svg: LOGO_SVG.to_string(),
        style: String::new(),
    }
}
