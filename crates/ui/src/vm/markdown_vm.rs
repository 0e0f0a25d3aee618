use std::collections::{HashMap, HashSet};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// A rendered chunk of lesson text, for front ends that do not speak HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Quote(String),
}

impl TextBlock {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TextBlock::Heading { text, .. } => text,
            TextBlock::Paragraph(text) | TextBlock::ListItem(text) | TextBlock::Quote(text) => text,
        }
    }
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render lesson markdown to HTML safe to embed in a page.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let normalized = normalize_markdown(input);
    let parser = Parser::new_ext(&normalized, parser_options());
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "code", "pre", "blockquote", "ul",
        "ol", "li", "a", "h1", "h2", "h3", "h4", "hr",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

/// Flatten lesson markdown into headings, paragraphs, list items and
/// quotes. Inline emphasis is dropped; the text is kept.
#[must_use]
pub fn markdown_to_blocks(input: &str) -> Vec<TextBlock> {
    let normalized = normalize_markdown(input);
    let mut blocks = Vec::new();
    let mut buffer = String::new();
    let mut heading: Option<u8> = None;
    let mut in_item = false;
    let mut quote_depth = 0usize;

    for event in Parser::new_ext(&normalized, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(heading_level(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                let level = heading.take().unwrap_or(1);
                push_block(&mut blocks, &mut buffer, |text| TextBlock::Heading {
                    level,
                    text,
                });
            }
            Event::Start(Tag::Item) => {
                flush_item(&mut blocks, &mut buffer, in_item);
                in_item = true;
            }
            Event::End(TagEnd::Item) => {
                flush_item(&mut blocks, &mut buffer, in_item);
                in_item = false;
            }
            Event::Start(Tag::BlockQuote(_)) => quote_depth += 1,
            Event::End(TagEnd::BlockQuote(_)) => {
                quote_depth = quote_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Paragraph) => {
                if in_item {
                    continue;
                }
                if quote_depth > 0 {
                    push_block(&mut blocks, &mut buffer, TextBlock::Quote);
                } else {
                    push_block(&mut blocks, &mut buffer, TextBlock::Paragraph);
                }
            }
            Event::Text(text) | Event::Code(text) => buffer.push_str(&text),
            Event::SoftBreak => buffer.push(' '),
            Event::HardBreak => buffer.push('\n'),
            _ => {}
        }
    }
    push_block(&mut blocks, &mut buffer, TextBlock::Paragraph);
    blocks
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn flush_item(blocks: &mut Vec<TextBlock>, buffer: &mut String, in_item: bool) {
    if in_item {
        push_block(blocks, buffer, TextBlock::ListItem);
    }
}

fn push_block(blocks: &mut Vec<TextBlock>, buffer: &mut String, make: impl FnOnce(String) -> TextBlock) {
    let text = buffer.trim().to_owned();
    buffer.clear();
    if !text.is_empty() {
        blocks.push(make(text));
    }
}

/// Unify line endings, strip trailing whitespace and collapse runs of blank
/// lines.
#[must_use]
pub fn normalize_markdown(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut blank_streak = 0usize;

    for line in normalized.split('\n') {
        let trimmed = line.trim_end_matches([' ', '\t']).to_string();
        if trimmed.is_empty() {
            blank_streak += 1;
            if blank_streak > 1 {
                continue;
            }
        } else {
            blank_streak = 0;
        }
        lines.push(trimmed);
    }

    let mut output = lines.join("\n");
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{TextBlock, markdown_to_blocks, markdown_to_html, normalize_markdown};

    #[test]
    fn normalize_markdown_trims_and_collapses_blank_lines() {
        let input = "Line one  \r\n\r\n\r\nLine two\t\r\n\r\n";
        let output = normalize_markdown(input);
        assert_eq!(output, "Line one\n\nLine two\n");
    }

    #[test]
    fn markdown_to_html_sanitizes_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn markdown_to_html_drops_raw_scripts() {
        let html = markdown_to_html("## Título\n\n<script>alert(1)</script>\n\nTexto");
        assert!(html.contains("<h2>Título</h2>"));
        assert!(!html.contains("<script"));
        assert!(html.contains("Texto"));
    }

    #[test]
    fn blocks_follow_document_structure() {
        let blocks = markdown_to_blocks(
            "## El mundo sensorial\n\nUn párrafo con **énfasis**\ny salto.\n\n- uno\n- dos\n\n> cita\n\n### Cierre",
        );
        assert_eq!(
            blocks,
            vec![
                TextBlock::Heading {
                    level: 2,
                    text: "El mundo sensorial".into()
                },
                TextBlock::Paragraph("Un párrafo con énfasis y salto.".into()),
                TextBlock::ListItem("uno".into()),
                TextBlock::ListItem("dos".into()),
                TextBlock::Quote("cita".into()),
                TextBlock::Heading {
                    level: 3,
                    text: "Cierre".into()
                },
            ]
        );
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(markdown_to_blocks("  \n\n").is_empty());
    }
}
