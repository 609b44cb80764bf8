use std::collections::HashMap;

use crate::{
    error::{VersecardError, VersecardResult},
    script::Script,
};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Font variant a line is measured and painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Regular,
    Italic,
}

/// Measurement and painting seam for one line of text.
///
/// Glyph shaping itself belongs to the host text stack; the layout and
/// compositing code only needs "how wide is this string" and "put this string
/// with its center at x, baseline at y". Font readiness is a caller
/// precondition: register fonts before measuring.
pub trait TextShaper {
    /// Measured advance width of `text` at `font_px`, in pixels.
    fn measure(
        &mut self,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
    ) -> VersecardResult<f32>;

    /// Paint one line horizontally centered on `center_x` with its baseline at
    /// `baseline_y`. Bidi reordering for RTL scripts is the shaper's concern.
    #[allow(clippy::too_many_arguments)]
    fn paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
        center_x: f32,
        baseline_y: f32,
        color: [u8; 4],
    ) -> VersecardResult<()>;
}

/// Production shaper backed by Parley layout and vello_cpu glyph rendering.
///
/// One font file is registered per script; measurement and painting both go
/// through the same registered face so widths match what gets drawn.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<Script, String>,
    fonts: HashMap<Script, vello_cpu::peniko::FontData>,
}

impl Default for ParleyShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyShaper {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    /// Register raw font bytes as the face used for `script`.
    pub fn register_font(&mut self, script: Script, font_bytes: &[u8]) -> VersecardResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            VersecardError::render_context("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                VersecardError::render_context("registered font family has no name")
            })?
            .to_string();

        self.families.insert(script, family_name);
        self.fonts.insert(
            script,
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
                0,
            ),
        );
        Ok(())
    }

    fn build_layout(
        &mut self,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
        brush: TextBrushRgba8,
    ) -> VersecardResult<parley::Layout<TextBrushRgba8>> {
        if !font_px.is_finite() || font_px <= 0.0 {
            return Err(VersecardError::render_context(
                "font size must be finite and > 0",
            ));
        }

        let family = self
            .families
            .get(&script)
            .ok_or_else(|| {
                VersecardError::render_context(format!("no font registered for {script:?}"))
            })?
            .clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_px));
        if style == TextStyle::Italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextShaper for ParleyShaper {
    fn measure(
        &mut self,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
    ) -> VersecardResult<f32> {
        let layout = self.build_layout(text, script, style, font_px, TextBrushRgba8::default())?;
        let mut width = 0.0f32;
        for line in layout.lines() {
            width = width.max(line.metrics().advance);
        }
        Ok(width)
    }

    fn paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
        center_x: f32,
        baseline_y: f32,
        color: [u8; 4],
    ) -> VersecardResult<()> {
        let brush = TextBrushRgba8 {
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
        };
        let layout = self.build_layout(text, script, style, font_px, brush)?;
        let font = self
            .fonts
            .get(&script)
            .cloned()
            .ok_or_else(|| {
                VersecardError::render_context(format!("no font registered for {script:?}"))
            })?;

        let Some(line) = layout.lines().next() else {
            return Ok(());
        };

        // Parley layouts put y=0 at the top; translate so the line's baseline
        // lands on baseline_y and its advance is centered on center_x.
        let x = center_x - line.metrics().advance / 2.0;
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(x),
                f64::from(baseline_y - run.baseline()),
            )));

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }

        Ok(())
    }
}

/// Deterministic shaper with a fixed per-character advance and no font files.
///
/// Used for headless previews and tests: `measure` is `chars × advance_em ×
/// font_px`, and `paint` draws a placeholder bar of exactly the measured width
/// so centering math stays pixel-checkable.
pub struct FixedAdvanceShaper {
    pub advance_em: f32,
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextShaper for FixedAdvanceShaper {
    fn measure(
        &mut self,
        text: &str,
        _script: Script,
        _style: TextStyle,
        font_px: f32,
    ) -> VersecardResult<f32> {
        Ok(text.chars().count() as f32 * self.advance_em * font_px)
    }

    fn paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        script: Script,
        style: TextStyle,
        font_px: f32,
        center_x: f32,
        baseline_y: f32,
        color: [u8; 4],
    ) -> VersecardResult<()> {
        let w = self.measure(text, script, style, font_px)?;
        if w <= 0.0 {
            return Ok(());
        }
        let ascent = font_px * 0.72;

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color[0], color[1], color[2], color[3],
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            f64::from(center_x - w / 2.0),
            f64::from(baseline_y - ascent),
            f64::from(center_x + w / 2.0),
            f64::from(baseline_y),
        ));
        Ok(())
    }
}
