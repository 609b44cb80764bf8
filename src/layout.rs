use crate::{
    error::{VersecardError, VersecardResult},
    script::{Direction, Script},
    shaper::{TextShaper, TextStyle},
};

/// Fraction of the surface width any rendered text line may occupy.
pub const WRAP_BUDGET_RATIO: f32 = 0.8;
/// Verse font size as a fraction of surface width.
pub const FONT_SCALE: f32 = 0.035;
/// Floor for the computed font size on very small surfaces.
pub const MIN_FONT_PX: f32 = 16.0;

/// Wrapped lines plus the font and spacing parameters to draw them with.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub lines: Vec<String>,
    pub line_height: f32,
    pub font_size_px: f32,
    pub direction: Direction,
}

/// Font size used for both measurement and drawing on a surface of this width.
pub fn font_size_for_width(surface_width: f32) -> f32 {
    (surface_width * FONT_SCALE).max(MIN_FONT_PX)
}

/// Wrap verse text to fit the surface's width budget.
///
/// Explicit `\n` breaks are honored first; any paragraph line wider than the
/// budget is split by greedy whitespace-word packing, re-measuring the whole
/// candidate string each time so inter-word spacing and kerning are priced in.
/// No hyphenation and no mid-word splits: word boundaries are assumed to be
/// whitespace, a known simplification for scripts that do not delimit words
/// with spaces. A single word wider than the budget is emitted on its own
/// overlong line rather than broken.
pub fn layout(
    text: &str,
    surface_width: f32,
    script: Script,
    shaper: &mut dyn TextShaper,
) -> VersecardResult<LayoutResult> {
    if text.trim().is_empty() {
        return Err(VersecardError::empty_input("verse text is empty"));
    }

    let profile = script.profile();
    let font_size_px = font_size_for_width(surface_width);
    let budget = surface_width * WRAP_BUDGET_RATIO;

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let width = shaper.measure(raw, script, TextStyle::Regular, font_size_px)?;
        if width <= budget {
            lines.push(raw.to_string());
            continue;
        }

        wrap_greedy(raw, budget, script, font_size_px, shaper, &mut lines)?;
    }

    debug_assert!(!lines.is_empty());
    Ok(LayoutResult {
        lines,
        line_height: font_size_px * profile.line_height,
        font_size_px,
        direction: profile.direction,
    })
}

fn wrap_greedy(
    paragraph: &str,
    budget: f32,
    script: Script,
    font_size_px: f32,
    shaper: &mut dyn TextShaper,
    out: &mut Vec<String>,
) -> VersecardResult<()> {
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        let width = shaper.measure(&candidate, script, TextStyle::Regular, font_size_px)?;
        if width <= budget {
            current = candidate;
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    Ok(())
}
