use crate::script::Script;

/// A user-selectable chunk of poem text, nominally two lines, offered as a
/// renderable quote. Lives for one rendering session; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerseUnit {
    /// Verse text. May contain one explicit `\n` separating the pair; a lone
    /// final line carries none, so its second component is empty.
    pub text: String,
    pub script: Script,
}

/// Group per-language poem lines pairwise, in original order, into verse units.
///
/// Unit `i` is `lines[2i] + "\n" + lines[2i+1]`, or `lines[2i]` alone when it is
/// the last, unpaired line. Whitespace-only lines are dropped before pairing.
/// Empty input yields an empty vec; callers treat that as "nothing to render".
///
/// Two lines per selectable verse is a presentation policy the surrounding UI
/// relies on, not a semantic property of the poem.
pub fn segment(lines: &[String], script: Script) -> Vec<VerseUnit> {
    let kept: Vec<&str> = lines
        .iter()
        .map(|l| l.as_str())
        .filter(|l| !l.trim().is_empty())
        .collect();

    kept.chunks(2)
        .map(|pair| VerseUnit {
            text: pair.join("\n"),
            script,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn even_input_pairs_every_line() {
        let units = segment(
            &lines(&["Roses are red", "Violets are blue", "Sugar is sweet", "And so are you"]),
            Script::Latin,
        );
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "Roses are red\nViolets are blue");
        assert_eq!(units[1].text, "Sugar is sweet\nAnd so are you");
    }

    #[test]
    fn odd_input_leaves_last_line_unpaired() {
        let input = lines(&["one", "two", "three", "four", "five"]);
        let units = segment(&input, Script::Latin);
        assert_eq!(units.len(), input.len().div_ceil(2));

        let last = &units.last().unwrap().text;
        let mut parts = last.split('\n');
        assert_eq!(parts.next(), Some("five"));
        // Second component of the final unit is empty.
        assert_eq!(parts.next().unwrap_or(""), "");
    }

    #[test]
    fn empty_input_yields_no_units() {
        assert_eq!(segment(&[], Script::Devanagari), vec![]);
    }

    #[test]
    fn whitespace_only_lines_are_dropped_before_pairing() {
        let units = segment(&lines(&["alpha", "   ", "beta"]), Script::Latin);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "alpha\nbeta");
    }

    #[test]
    fn order_is_preserved() {
        let units = segment(&lines(&["a", "b", "c", "d", "e", "f"]), Script::Nastaliq);
        let joined: Vec<&str> = units
            .iter()
            .flat_map(|u| u.text.split('\n'))
            .collect();
        assert_eq!(joined, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(units.iter().all(|u| u.script == Script::Nastaliq));
    }
}
