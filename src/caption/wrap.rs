/// Average-glyph-width factor used to estimate rendered line widths.
///
/// This is a deliberate heuristic, not a font-metrics query; reproducing it
/// exactly keeps line breaks identical across renderers.
pub(crate) const AVG_GLYPH_WIDTH_FACTOR: f32 = 0.55;

/// Estimated rendered width of `line` at `font_size`.
pub(crate) fn estimated_width(line: &str, font_size: f32) -> f32 {
    line.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH_FACTOR
}

/// Greedily word-wrap `text` so no line's estimated width exceeds
/// `max_width`, except for a single word that is itself too long (words are
/// never broken mid-word).
pub fn wrap_caption(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if !current.is_empty() && estimated_width(&candidate, font_size) > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_produces_no_lines() {
        assert!(wrap_caption("", 40.0, 800.0).is_empty());
        assert!(wrap_caption("   \n\t ", 40.0, 800.0).is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_caption("new drop", 40.0, 800.0);
        assert_eq!(lines, vec!["new drop"]);
    }

    #[test]
    fn no_line_exceeds_width_except_single_long_words() {
        let text = "a collection of reasonably sized caption words plus an \
                    extraordinarilyoverlongunbreakabletoken in the middle";
        let font_size = 44.0;
        let max_width = 500.0;
        let lines = wrap_caption(text, font_size, max_width);
        assert!(lines.len() > 1);
        for line in &lines {
            let fits = estimated_width(line, font_size) <= max_width;
            let single_word = !line.contains(' ');
            assert!(
                fits || single_word,
                "line {line:?} overflows and is not a lone word"
            );
        }
    }

    #[test]
    fn overlong_word_sits_alone() {
        let lines = wrap_caption("ok thiswordiswaytoolongtofit ok", 40.0, 200.0);
        assert!(lines.contains(&"thiswordiswaytoolongtofit".to_owned()));
    }

    #[test]
    fn wrapping_is_deterministic() {
        let text = "the same caption wrapped twice must break identically";
        assert_eq!(
            wrap_caption(text, 44.0, 400.0),
            wrap_caption(text, 44.0, 400.0)
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        let lines = wrap_caption("two   words", 40.0, 800.0);
        assert_eq!(lines, vec!["two words"]);
    }
}
