use crate::{
    error::{VersecardError, VersecardResult},
    procedural,
};

/// In-memory pixel buffer, the unit of composition and final encoding.
/// Pixels are row-major premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba8_premul: vec![0u8; width as usize * height as usize * 4],
        }
    }
}

/// Where the card background comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundSpec {
    /// Fetch and decode an image from a URL.
    RemoteUrl(String),
    /// Decode bytes handed over by the user (file picker upload).
    UserBytes(Vec<u8>),
    /// Deterministic generated scene; needs no network and no user effort.
    Procedural { seed: Option<String> },
}

/// Resolves a [`BackgroundSpec`] to pixels.
///
/// Remote fetch and decode are the only asynchronous steps in the render
/// pipeline. The resolver imposes no timeout and never retries; both are
/// caller policy.
pub struct BackgroundResolver {
    client: reqwest::Client,
    procedural_size: u32,
}

impl Default for BackgroundResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            procedural_size: procedural::DEFAULT_SIZE,
        }
    }

    /// Override the square size used for procedural backgrounds.
    pub fn with_procedural_size(mut self, size: u32) -> Self {
        self.procedural_size = size;
        self
    }

    #[tracing::instrument(skip(self, spec))]
    pub async fn resolve(&self, spec: &BackgroundSpec) -> VersecardResult<PixelSurface> {
        match spec {
            BackgroundSpec::RemoteUrl(url) => {
                let bytes = self.fetch(url).await?;
                decode_background(&bytes)
            }
            BackgroundSpec::UserBytes(bytes) => decode_background(bytes),
            BackgroundSpec::Procedural { seed } => {
                Ok(procedural::generate(seed.as_deref(), self.procedural_size))
            }
        }
    }

    async fn fetch(&self, url: &str) -> VersecardResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VersecardError::image_decode(format!("fetch '{url}': {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VersecardError::image_decode(format!(
                "fetch '{url}': status {status}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| VersecardError::image_decode(format!("read body of '{url}': {e}")))?;
        tracing::debug!(url, len = bytes.len(), "fetched background");
        Ok(bytes.to_vec())
    }
}

/// Decode image bytes into a premultiplied RGBA8 surface.
pub fn decode_background(bytes: &[u8]) -> VersecardResult<PixelSurface> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| VersecardError::image_decode(format!("decode background image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PixelSurface {
        width,
        height,
        rgba8_premul,
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
