use crate::compose::RenderedImage;

/// Suffix appended to every suggested card filename.
pub const FILE_SUFFIX: &str = "-verse";
/// Extension matching the fixed JPEG encoding of the compositor.
pub const FILE_EXTENSION: &str = ".jpg";
/// Base used when the caller supplies no usable name.
pub const DEFAULT_BASE: &str = "poem";

/// Lowercase `name` and collapse runs of non-alphanumerics into single hyphens.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Collision-tolerant download filename for a card.
pub fn suggest_file_name(base: &str) -> String {
    let slug = slugify(base);
    let slug = if slug.is_empty() { DEFAULT_BASE } else { &slug };
    format!("{slug}{FILE_SUFFIX}{FILE_EXTENSION}")
}

/// Turn a rendered card into the `(filename, bytes)` pair a host needs to
/// trigger a file save. Pure and synchronous.
pub fn to_download(image: RenderedImage, base_name: &str) -> (String, Vec<u8>) {
    (suggest_file_name(base_name), image.encoded_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Dagh e Dil"), "dagh-e-dil");
        assert_eq!(slugify("  Mir   Taqi  Mir "), "mir-taqi-mir");
        assert_eq!(slugify("Ghazal #12 (draft)"), "ghazal-12-draft");
    }

    #[test]
    fn slugify_keeps_non_latin_letters() {
        assert_eq!(slugify("मीर तक़ी"), "मीर-तक़ी");
    }

    #[test]
    fn empty_base_falls_back_to_default() {
        assert_eq!(suggest_file_name("   "), "poem-verse.jpg");
        assert_eq!(suggest_file_name(""), "poem-verse.jpg");
    }

    #[test]
    fn suggested_name_carries_suffix_and_extension() {
        assert_eq!(suggest_file_name("Yaad"), "yaad-verse.jpg");
    }
}
