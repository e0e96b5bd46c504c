use crate::geometry::px_to_mm;
use crate::svg::TextLine;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Baseline nudge, as a fraction of the font size, that makes the block
/// look centered across SVG renderers.
pub const BASELINE_CORRECTION: f64 = 1.0 / 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub font_size: f64,
    pub line_height: f64,
    pub block_height: f64,
    pub lines: Vec<TextLine>,
}

/// Splits `text` on newlines and stacks the lines so the block sits in
/// the middle of `[top, top + height]`.
///
/// Each line is trimmed. `lines[i].y` is a baseline.
pub fn layout_lines(text: &str, font_size_px: f64, top: f64, height: f64) -> TextLayout {
    let font_size = px_to_mm(font_size_px);
    let line_height = font_size * LINE_HEIGHT_RATIO;
    let gap = line_height - font_size;

    let raw_lines: Vec<&str> = text.split('\n').collect();
    let count = raw_lines.len() as f64;
    let block_height = count * font_size + (count - 1.0) * gap;

    let middle = top + height / 2.0;
    let first_top = middle - block_height / 2.0 - font_size * BASELINE_CORRECTION;

    let lines = raw_lines
        .iter()
        .enumerate()
        .map(|(index, line)| TextLine {
            text: line.trim().to_string(),
            y: first_top + index as f64 * line_height + font_size,
        })
        .collect();

    TextLayout {
        font_size,
        line_height,
        block_height,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn single_line_is_centered_with_baseline_correction() {
        let layout = layout_lines("Oven", 15.0, 23.5, 13.5);
        let fs = px_to_mm(15.0);

        assert_eq!(layout.lines.len(), 1);
        assert!((layout.block_height - fs).abs() < EPSILON);
        // line box top = middle - fs/2 - fs/6, baseline one font size lower
        let expected = 30.25 - fs / 2.0 - fs / 6.0 + fs;
        assert!((layout.lines[0].y - expected).abs() < EPSILON);
    }

    #[test]
    fn three_lines_center_the_middle_line() {
        let top = 23.5;
        let height = 13.5;
        let layout = layout_lines("Kitchen\nsockets\nleft", 15.0, top, height);
        let fs = layout.font_size;
        let middle = top + height / 2.0;

        assert_eq!(layout.lines.len(), 3);
        assert!((layout.line_height - fs * 1.2).abs() < EPSILON);
        assert!((layout.block_height - (3.0 * fs + 2.0 * 0.2 * fs)).abs() < EPSILON);

        let middle_line_center = layout.lines[1].y - fs / 2.0;
        assert!((middle_line_center - (middle - fs / 6.0)).abs() < EPSILON);
    }

    #[test]
    fn lines_advance_by_one_line_height() {
        let layout = layout_lines("a\nb\nc\nd", 12.0, 0.0, 20.0);
        for pair in layout.lines.windows(2) {
            assert!((pair[1].y - pair[0].y - layout.line_height).abs() < EPSILON);
        }
    }

    #[test]
    fn lines_are_trimmed_but_kept() {
        let layout = layout_lines("  Heat pump \r\n\n  outdoor", 15.0, 0.0, 10.0);
        let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Heat pump", "", "outdoor"]);
    }
}
