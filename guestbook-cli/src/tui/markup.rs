//! Turn formatted message HTML back into styled terminal lines
//!
//! Only understands what `format_message` emits: `<br>`, `<strong>`, `<em>`
//! and the five escape entities.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

struct LineBuilder {
    base: Style,
    bold: bool,
    italic: bool,
    text: String,
    spans: Vec<Span<'static>>,
    lines: Vec<Line<'static>>,
}

impl LineBuilder {
    fn style(&self) -> Style {
        let mut style = self.base;
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }

    fn flush_span(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.spans.push(Span::styled(text, self.style()));
        }
    }

    fn break_line(&mut self) {
        self.flush_span();
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }
}

pub fn markup_lines(html: &str, base: Style) -> Vec<Line<'static>> {
    let mut b = LineBuilder {
        base,
        bold: false,
        italic: false,
        text: String::new(),
        spans: Vec::new(),
        lines: Vec::new(),
    };

    let mut rest = html;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<br>") {
            b.break_line();
            rest = after;
            continue;
        }

        let toggles = [
            ("<strong>", Some(true), None),
            ("</strong>", Some(false), None),
            ("<em>", None, Some(true)),
            ("</em>", None, Some(false)),
        ];
        if let Some((tag, bold, italic)) = toggles.iter().find(|(tag, _, _)| rest.starts_with(tag)) {
            b.flush_span();
            if let Some(bold) = bold {
                b.bold = *bold;
            }
            if let Some(italic) = italic {
                b.italic = *italic;
            }
            rest = &rest[tag.len()..];
            continue;
        }

        if let Some((entity, c)) = ENTITIES.iter().find(|(e, _)| rest.starts_with(e)) {
            b.text.push(*c);
            rest = &rest[entity.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            b.text.push(c);
        }
        rest = chars.as_str();
    }

    b.break_line();
    b.lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use guestbook_core::format_message;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn bold_and_italic_spans() {
        let lines = markup_lines(&format_message("Hello **world** and *you*"), Style::default());
        assert_eq!(plain(&lines), vec!["Hello world and you"]);

        let spans = &lines[0].spans;
        assert_eq!(spans[1].content, "world");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "you");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn line_breaks_and_entities() {
        let lines = markup_lines(&format_message("<a> & 'b'\nnext"), Style::default());
        assert_eq!(plain(&lines), vec!["<a> & 'b'", "next"]);
    }

    #[test]
    fn empty_body_is_one_empty_line() {
        assert_eq!(markup_lines("", Style::default()).len(), 1);
    }
}
