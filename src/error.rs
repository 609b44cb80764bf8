pub type VersecardResult<T> = Result<T, VersecardError>;

#[derive(thiserror::Error, Debug)]
pub enum VersecardError {
    /// Background bytes were not a decodable image, or the remote fetch failed.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Verse text was empty or whitespace-only.
    #[error("empty input error: {0}")]
    EmptyInput(String),

    /// A drawing surface could not be allocated for this request.
    #[error("render context error: {0}")]
    RenderContext(String),

    /// Encoding the finished surface failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VersecardError {
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn render_context(msg: impl Into<String>) -> Self {
        Self::RenderContext(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            VersecardError::image_decode("x")
                .to_string()
                .contains("image decode error:")
        );
        assert!(
            VersecardError::empty_input("x")
                .to_string()
                .contains("empty input error:")
        );
        assert!(
            VersecardError::render_context("x")
                .to_string()
                .contains("render context error:")
        );
        assert!(
            VersecardError::serialization("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = VersecardError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
