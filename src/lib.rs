//! Versecard turns a short piece of multilingual poetry into a shareable
//! raster card: pick a verse, pick a background (your own image, a URL, or a
//! generated scene), and get back encoded bytes plus a download filename.
//!
//! The pipeline is `segment()` → [`Compositor::compose`] → `to_download()`.
//! Text measurement and glyph painting go through the [`TextShaper`] seam;
//! register fonts on a [`ParleyShaper`] before rendering real scripts.
#![forbid(unsafe_code)]

pub mod background;
pub mod composite;
pub mod compose;
pub mod error;
pub mod export;
pub mod layout;
pub mod preview;
pub mod procedural;
pub mod script;
pub mod segment;
pub mod shaper;

pub use background::{BackgroundResolver, BackgroundSpec, PixelSurface};
pub use compose::{ComposeOptions, Compositor, RenderRequest, RenderedImage};
pub use error::{VersecardError, VersecardResult};
pub use export::to_download;
pub use layout::{LayoutResult, layout};
pub use preview::{PreviewGate, RenderTicket};
pub use script::{Direction, Script, ScriptProfile};
pub use segment::{VerseUnit, segment};
pub use shaper::{FixedAdvanceShaper, ParleyShaper, TextShaper, TextStyle};
