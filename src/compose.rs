use crate::{
    background::{BackgroundResolver, BackgroundSpec, PixelSurface},
    composite,
    error::{VersecardError, VersecardResult},
    export,
    layout::layout,
    segment::VerseUnit,
    shaper::{TextShaper, TextStyle},
};

/// One render invocation's inputs. Consumed per call, never retained.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub verse: VerseUnit,
    pub background: BackgroundSpec,
    /// Author display name; painted as `— name` near the bottom of the card.
    pub attribution: String,
    /// Optional poem title, used for the suggested download filename.
    pub title: Option<String>,
}

/// Finished card: composited pixels, encoded bytes, and a download name.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub surface: PixelSurface,
    pub encoded_bytes: Vec<u8>,
    pub suggested_file_name: String,
}

/// Fixed styling knobs for card composition.
#[derive(Clone, Debug)]
pub struct ComposeOptions {
    /// Opacity of the uniform black contrast overlay painted over the background.
    pub overlay_alpha: u8,
    pub text_rgba: [u8; 4],
    pub attribution_rgba: [u8; 4],
    /// Attribution baseline as a fraction of surface height.
    pub attribution_v_pos: f32,
    /// Attribution font size as a fraction of the verse font size.
    pub attribution_scale: f32,
    pub jpeg_quality: u8,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            overlay_alpha: 115,
            text_rgba: [255, 255, 255, 255],
            attribution_rgba: [222, 216, 200, 255],
            attribution_v_pos: 0.85,
            attribution_scale: 0.6,
            jpeg_quality: 90,
        }
    }
}

/// Baseline of the first verse line when `line_count` lines of `line_height`
/// are vertically centered on a surface of height `surface_h`.
pub fn vertical_start(surface_h: f32, line_count: usize, line_height: f32) -> f32 {
    (surface_h - line_count as f32 * line_height) / 2.0 + line_height / 2.0
}

/// Orchestrates background resolution, text layout, drawing, and encoding.
pub struct Compositor {
    shaper: Box<dyn TextShaper>,
    resolver: BackgroundResolver,
    options: ComposeOptions,
}

impl Compositor {
    pub fn new(shaper: Box<dyn TextShaper>) -> Self {
        Self::with_options(shaper, BackgroundResolver::new(), ComposeOptions::default())
    }

    pub fn with_options(
        shaper: Box<dyn TextShaper>,
        resolver: BackgroundResolver,
        options: ComposeOptions,
    ) -> Self {
        Self {
            shaper,
            resolver,
            options,
        }
    }

    /// Resolve the background and render the card.
    ///
    /// Empty verse text fails fast with `EmptyInput` before any background
    /// resolution happens, so no network traffic is spent on an unrenderable
    /// request.
    #[tracing::instrument(skip(self, request))]
    pub async fn compose(&mut self, request: &RenderRequest) -> VersecardResult<RenderedImage> {
        if request.verse.text.trim().is_empty() {
            return Err(VersecardError::empty_input("verse text is empty"));
        }
        let background = self.resolver.resolve(&request.background).await?;
        self.compose_on(&background, request)
    }

    /// Render onto an already-resolved background.
    ///
    /// Pure with respect to I/O: callers re-run this for previews whenever the
    /// verse changes, without re-resolving the background.
    pub fn compose_on(
        &mut self,
        background: &PixelSurface,
        request: &RenderRequest,
    ) -> VersecardResult<RenderedImage> {
        if request.verse.text.trim().is_empty() {
            return Err(VersecardError::empty_input("verse text is empty"));
        }

        let (width, height) = (background.width, background.height);
        if width == 0 || height == 0 {
            return Err(VersecardError::render_context(
                "background surface has a zero dimension",
            ));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| VersecardError::render_context("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| VersecardError::render_context("surface height exceeds u16"))?;
        if background.rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(VersecardError::render_context(
                "background byte length mismatch",
            ));
        }

        let mut pixels = background.rgba8_premul.clone();
        composite::darken_in_place(&mut pixels, self.options.overlay_alpha)?;

        let script = request.verse.script;
        let lay = layout(
            &request.verse.text,
            width as f32,
            script,
            self.shaper.as_mut(),
        )?;

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        let center_x = width as f32 / 2.0;
        let start_y = vertical_start(height as f32, lay.lines.len(), lay.line_height);
        for (i, line) in lay.lines.iter().enumerate() {
            self.shaper.paint(
                &mut ctx,
                line,
                script,
                TextStyle::Regular,
                lay.font_size_px,
                center_x,
                start_y + i as f32 * lay.line_height,
                self.options.text_rgba,
            )?;
        }

        let attribution = request.attribution.trim();
        if !attribution.is_empty() {
            self.shaper.paint(
                &mut ctx,
                &format!("— {attribution}"),
                script,
                TextStyle::Italic,
                lay.font_size_px * self.options.attribution_scale,
                center_x,
                height as f32 * self.options.attribution_v_pos,
                self.options.attribution_rgba,
            )?;
        }

        ctx.flush();
        let mut text_layer = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut text_layer);
        composite::over_in_place(&mut pixels, text_layer.data_as_u8_slice())?;

        let surface = PixelSurface {
            width,
            height,
            rgba8_premul: pixels,
        };
        let encoded_bytes = encode_jpeg(&surface, self.options.jpeg_quality)?;
        let base = request
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&request.attribution);

        tracing::debug!(width, height, lines = lay.lines.len(), "composed card");
        Ok(RenderedImage {
            suggested_file_name: export::suggest_file_name(base),
            surface,
            encoded_bytes,
        })
    }
}

/// Serialize a surface to JPEG at the given quality.
pub fn encode_jpeg(surface: &PixelSurface, quality: u8) -> VersecardResult<Vec<u8>> {
    let px_count = surface.width as usize * surface.height as usize;
    if surface.rgba8_premul.len() != px_count * 4 {
        return Err(VersecardError::serialization("surface byte length mismatch"));
    }

    let mut rgb = Vec::with_capacity(px_count * 3);
    for px in surface.rgba8_premul.chunks_exact(4) {
        let a = px[3] as u16;
        if a == 0 {
            rgb.extend_from_slice(&[0, 0, 0]);
        } else {
            for c in 0..3 {
                rgb.push(((px[c] as u16 * 255 + a / 2) / a).min(255) as u8);
            }
        }
    }

    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    image::ImageEncoder::write_image(
        encoder,
        &rgb,
        surface.width,
        surface.height,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| VersecardError::serialization(format!("encode jpeg: {e}")))?;
    Ok(out)
}
