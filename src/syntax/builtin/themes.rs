//! Built-in themes
//!
//! Comments and strings are styled at two-segment selectors as well, so
//! at equal rank they override operators and numbers inside them (the
//! built-in grammars list their literals last).

use crate::syntax::style::StyleAttributes;
use crate::syntax::theme::Theme;

fn fg(color: &str) -> StyleAttributes {
    StyleAttributes::new().with_foreground(color)
}

/// Palette entries shared by the built-in themes, in cascade order
struct Palette {
    base: (&'static str, &'static str),
    comment: &'static str,
    string: &'static str,
    escape: &'static str,
    number: &'static str,
    constant: &'static str,
    keyword: &'static str,
    control: &'static str,
    operator: &'static str,
    storage: &'static str,
    function: &'static str,
    type_name: &'static str,
    preprocessor: &'static str,
    attribute: &'static str,
    invalid: &'static str,
}

fn build(name: &str, p: &Palette) -> Theme {
    let comment = fg(p.comment).with_font_style("italic");
    let string = fg(p.string);
    let keyword = fg(p.keyword).with_font_style("bold");
    let control = fg(p.control).with_font_style("bold");

    Theme::new(fg(p.base.0).with_background(p.base.1))
        .named(name)
        .with_rule("comment", comment.clone())
        .with_rule("comment.line", comment.clone())
        .with_rule("comment.block", comment)
        .with_rule("string", string.clone())
        .with_rule("string.quoted", string)
        .with_rule("constant", fg(p.constant))
        .with_rule("constant.numeric", fg(p.number))
        .with_rule("constant.character.escape", fg(p.escape))
        .with_rule("keyword", keyword)
        .with_rule("keyword.control", control)
        .with_rule("keyword.operator", fg(p.operator))
        .with_rule("storage", fg(p.storage))
        .with_rule("support.type", fg(p.type_name))
        .with_rule("support.type.property-name", fg(p.function))
        .with_rule("entity.name.type", fg(p.type_name))
        .with_rule("entity.name.function", fg(p.function))
        .with_rule("meta.preprocessor", fg(p.preprocessor))
        .with_rule("meta.attribute", fg(p.attribute))
        .with_rule("invalid.illegal", fg(p.invalid).with_font_style("underline"))
}

/// Dark theme
pub fn dark_theme() -> Theme {
    build(
        "dark",
        &Palette {
            base: ("#ABB2BF", "#282C34"),
            comment: "#7F848E",
            string: "#98C379",
            escape: "#E5C07B",
            number: "#56B6C2",
            constant: "#E06C75",
            keyword: "#C678DD",
            control: "#C678DD",
            operator: "#D7DAE0",
            storage: "#C678DD",
            function: "#61AFEF",
            type_name: "#E5C07B",
            preprocessor: "#FF79C6",
            attribute: "#82AAFF",
            invalid: "#FF5555",
        },
    )
}

/// Light theme
pub fn light_theme() -> Theme {
    build(
        "light",
        &Palette {
            base: ("#383A42", "#FAFAFA"),
            comment: "#A0A1A7",
            string: "#50A14F",
            escape: "#C18401",
            number: "#0184BC",
            constant: "#E45649",
            keyword: "#A626A4",
            control: "#A626A4",
            operator: "#383A42",
            storage: "#A626A4",
            function: "#4078F2",
            type_name: "#C18401",
            preprocessor: "#D73A49",
            attribute: "#4078F2",
            invalid: "#CA1243",
        },
    )
}

/// Visual Studio Code "Dark+" colors
pub fn dark_plus_theme() -> Theme {
    build(
        "dark-plus",
        &Palette {
            base: ("#D4D4D4", "#1E1E1E"),
            comment: "#6A9955",
            string: "#CE9178",
            escape: "#D7BA7D",
            number: "#B5CEA8",
            constant: "#569CD6",
            keyword: "#569CD6",
            control: "#C586C0",
            operator: "#D4D4D4",
            storage: "#569CD6",
            function: "#DCDCAA",
            type_name: "#4EC9B0",
            preprocessor: "#C586C0",
            attribute: "#4EC9B0",
            invalid: "#F44747",
        },
    )
}

/// Visual Studio Code "Light+" colors
pub fn light_plus_theme() -> Theme {
    build(
        "light-plus",
        &Palette {
            base: ("#000000", "#FFFFFF"),
            comment: "#008000",
            string: "#A31515",
            escape: "#EE0000",
            number: "#098658",
            constant: "#0000FF",
            keyword: "#0000FF",
            control: "#AF00DB",
            operator: "#000000",
            storage: "#0000FF",
            function: "#795E26",
            type_name: "#267F99",
            preprocessor: "#AF00DB",
            attribute: "#267F99",
            invalid: "#CD3131",
        },
    )
}

/// Monokai colors
pub fn monokai_theme() -> Theme {
    build(
        "monokai",
        &Palette {
            base: ("#F8F8F2", "#272822"),
            comment: "#75715E",
            string: "#E6DB74",
            escape: "#AE81FF",
            number: "#AE81FF",
            constant: "#AE81FF",
            keyword: "#F92672",
            control: "#F92672",
            operator: "#F92672",
            storage: "#F92672",
            function: "#A6E22E",
            type_name: "#66D9EF",
            preprocessor: "#F92672",
            attribute: "#A6E22E",
            invalid: "#F8F8F0",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::style::{Color, FontStyle};

    #[test]
    fn test_dark_theme_resolves() {
        let theme = dark_theme();
        let (style, rank) = theme.resolve("comment.line.double-slash.c");
        assert_eq!(rank, 2);
        assert_eq!(style.font_style(), Some(FontStyle::Italic));

        let (style, rank) = theme.resolve("constant.character.escape.json");
        assert_eq!(rank, 3);
        assert_eq!(style.foreground(), Some(Color::rgb(0xE5, 0xC0, 0x7B)));

        assert!(theme.resolve("keyword.control.rust").0.is_bold());
        assert_eq!(theme.resolve("punctuation.separator.json").1, -1);
        assert_eq!(theme.base().background(), Some(Color::rgb(0x28, 0x2C, 0x34)));
    }

    #[test]
    fn test_dark_plus_separates_control_keywords() {
        let theme = dark_plus_theme();
        assert_eq!(
            theme.resolve("keyword.control.cs").0.foreground(),
            Some(Color::rgb(0xC5, 0x86, 0xC0))
        );
        assert_eq!(
            theme.resolve("keyword.other.cs").0.foreground(),
            Some(Color::rgb(0x56, 0x9C, 0xD6))
        );
        assert_eq!(theme.base().background(), Some(Color::rgb(0x1E, 0x1E, 0x1E)));
    }
}
