/// Writing systems the platform publishes poetry in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Devanagari,
    Nastaliq,
}

/// Horizontal text direction of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Static per-script rendering parameters. Never mutated at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptProfile {
    /// Preferred font family name for this script.
    pub font_family: &'static str,
    pub direction: Direction,
    /// Line height as a multiple of the font size. Nastaliq carries a taller
    /// multiplier to fit its ascent/descent.
    pub line_height: f32,
}

impl Script {
    pub fn profile(self) -> ScriptProfile {
        match self {
            Script::Latin => ScriptProfile {
                font_family: "Merriweather",
                direction: Direction::Ltr,
                line_height: 1.5,
            },
            Script::Devanagari => ScriptProfile {
                font_family: "Noto Sans Devanagari",
                direction: Direction::Ltr,
                line_height: 1.5,
            },
            Script::Nastaliq => ScriptProfile {
                font_family: "Noto Nastaliq Urdu",
                direction: Direction::Rtl,
                line_height: 2.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nastaliq_is_rtl_and_taller() {
        let p = Script::Nastaliq.profile();
        assert_eq!(p.direction, Direction::Rtl);
        assert!(p.line_height > Script::Latin.profile().line_height);
    }

    #[test]
    fn latin_and_devanagari_share_line_height() {
        assert_eq!(
            Script::Latin.profile().line_height,
            Script::Devanagari.profile().line_height
        );
    }

    #[test]
    fn serde_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Script::Nastaliq).unwrap(), "\"nastaliq\"");
        let s: Script = serde_json::from_str("\"devanagari\"").unwrap();
        assert_eq!(s, Script::Devanagari);
    }
}
