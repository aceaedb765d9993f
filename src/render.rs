//! Terminal rendering of styled spans using crossterm

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color, ContentStyle, Print, PrintStyledContent, StyledContent},
};

use crate::syntax::{Color as StyleColor, FontStyle, Span, StyleAttributes};

fn term_color(color: StyleColor) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Map span style attributes onto a terminal style
///
/// Alpha and font size have no terminal equivalent and are ignored.
pub fn content_style(style: &StyleAttributes) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.foreground().map(term_color);
    content.background_color = style.background().map(term_color);
    if style.is_bold() {
        content.attributes.set(Attribute::Bold);
    }
    if matches!(style.font_style(), Some(FontStyle::Italic | FontStyle::Oblique)) {
        content.attributes.set(Attribute::Italic);
    }
    if style.is_underline() {
        content.attributes.set(Attribute::Underlined);
    }
    content
}

/// Write `text` with each span's style applied
///
/// Spans are expected to be disjoint and ordered, as produced by the
/// highlight pipeline. Text not covered by any span is written unstyled.
pub fn write_spans<W: Write>(out: &mut W, text: &str, spans: &[Span]) -> io::Result<()> {
    let mut pos = 0;
    for span in spans {
        if span.start < pos {
            continue;
        }
        if span.start > pos {
            if let Some(gap) = text.get(pos..span.start) {
                queue!(out, Print(gap))?;
            }
        }
        let Some(slice) = text.get(span.start..span.end) else {
            tracing::warn!(start = span.start, end = span.end, "span is not on a char boundary");
            continue;
        };
        let style = content_style(&span.style);
        queue!(out, PrintStyledContent(StyledContent::new(style, slice)))?;
        pos = span.end;
    }
    if let Some(rest) = text.get(pos..) {
        queue!(out, Print(rest))?;
    }
    out.flush()
}

/// Write `text` without any styling
pub fn write_spans_plain<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, spans: &[Span]) -> String {
        let mut out = Vec::new();
        write_spans(&mut out, text, spans).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_content_style() {
        let style = StyleAttributes::new()
            .with_foreground("#FF0000")
            .with_font_style("italic underline")
            .with_font_weight("bold");
        let content = content_style(&style);
        assert_eq!(content.foreground_color, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(content.background_color, None);
        assert!(content.attributes.has(Attribute::Bold));
        assert!(content.attributes.has(Attribute::Italic));
        assert!(content.attributes.has(Attribute::Underlined));
    }

    #[test]
    fn test_write_spans_keeps_text() {
        let red = StyleAttributes::new().with_foreground("#FF0000");
        let spans = vec![
            Span::new(0, 4, StyleAttributes::new()),
            Span::new(4, 8, red),
        ];
        let out = render("x = true\n", &spans);
        assert!(out.contains("\x1b[38;2;255;0;0m"));
        assert!(out.contains("true"));
        assert!(out.starts_with("x = "));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_write_spans_gaps_are_plain() {
        let spans = vec![Span::new(2, 3, StyleAttributes::new().with_foreground("#00FF00"))];
        let out = render("abcd", &spans);
        assert!(out.starts_with("ab"));
        assert!(out.ends_with('d'));
    }

    #[test]
    fn test_write_spans_plain() {
        let mut out = Vec::new();
        write_spans_plain(&mut out, "plain text").unwrap();
        assert_eq!(out, b"plain text");
    }
}
