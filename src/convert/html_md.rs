// src/convert/html_md.rs
//! HTML to Markdown conversion for note content
//!
//! Covers the markup flomo produces: paragraphs, headings, emphasis, links,
//! lists, quotes and code. Images are not rendered here; the extractor
//! appends them as embeds after the text.

use scraper::{ElementRef, Node};

/// Convert the children of `element` to Markdown, trimmed.
pub fn to_markdown(element: ElementRef<'_>) -> String {
    convert_children(element)
}

fn convert_children(element: ElementRef<'_>) -> String {
    let mut writer = MarkdownWriter::default();
    write_children(&mut writer, element);
    writer.finish()
}

fn write_children(writer: &mut MarkdownWriter, element: ElementRef<'_>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => writer.push_text(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(writer, child);
                }
            }
            _ => {}
        }
    }
}

fn write_element(writer: &mut MarkdownWriter, element: ElementRef<'_>) {
    let name = element.value().name();
    match name {
        "img" | "script" | "style" | "noscript" | "template" | "head" | "title" => {}
        "br" => writer.push_line_break(),
        "hr" => writer.push_block("---"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse::<usize>().unwrap_or(1);
            let text = convert_children(element).replace('\n', " ");
            if !text.is_empty() {
                writer.push_block(&format!("{} {}", "#".repeat(level), text));
            }
        }
        "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "aside"
        | "figure" | "figcaption" | "table" | "tr" | "dl" | "dd" | "dt" => {
            writer.push_block(&convert_children(element));
        }
        "strong" | "b" => writer.push_wrapped(&convert_children(element), "**"),
        "em" | "i" => writer.push_wrapped(&convert_children(element), "*"),
        "del" | "s" | "strike" => writer.push_wrapped(&convert_children(element), "~~"),
        "code" => {
            let code: String = element.text().collect();
            if !code.is_empty() {
                writer.push_inline(&format!("`{}`", code));
            }
        }
        "pre" => {
            let code: String = element.text().collect();
            writer.push_block(&format!("```\n{}\n```", code.trim_end_matches('\n')));
        }
        "a" => {
            let text = convert_children(element);
            match element.value().attr("href").map(str::trim) {
                Some(href) if !href.is_empty() => {
                    writer.push_inline(&format!("[{}]({})", text, href));
                }
                _ => writer.push_inline(&text),
            }
        }
        "ul" | "ol" => writer.push_block(&convert_list(element, name == "ol")),
        "blockquote" => {
            let quoted = convert_children(element)
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            writer.push_block(&quoted);
        }
        "td" | "th" => {
            writer.push_inline(&convert_children(element));
            writer.push_text(" ");
        }
        _ => write_children(writer, element),
    }
}

fn convert_list(list: ElementRef<'_>, ordered: bool) -> String {
    let mut items = Vec::new();

    for item in list.children().filter_map(ElementRef::wrap) {
        if item.value().name() != "li" {
            continue;
        }
        let marker = if ordered {
            format!("{}. ", items.len() + 1)
        } else {
            "- ".to_string()
        };
        let indent = " ".repeat(marker.len());
        let body = convert_children(item);

        let mut rendered = String::new();
        for (i, line) in body.lines().enumerate() {
            if i == 0 {
                rendered.push_str(&marker);
                rendered.push_str(line);
            } else {
                rendered.push('\n');
                if !line.is_empty() {
                    rendered.push_str(&indent);
                    rendered.push_str(line);
                }
            }
        }
        if rendered.is_empty() {
            rendered.push_str(marker.trim_end());
        }
        items.push(rendered);
    }

    items.join("\n")
}

/// Accumulates Markdown while collapsing HTML whitespace.
#[derive(Default)]
struct MarkdownWriter {
    out: String,
}

impl MarkdownWriter {
    /// Append text with whitespace runs collapsed to one space.
    ///
    /// Whitespace at the start of a line is dropped.
    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                if !self.at_line_start() && !self.out.ends_with(' ') {
                    self.out.push(' ');
                }
            } else {
                self.out.push(c);
            }
        }
    }

    fn push_inline(&mut self, markdown: &str) {
        self.out.push_str(markdown);
    }

    fn push_wrapped(&mut self, inner: &str, marker: &str) {
        if !inner.is_empty() {
            self.out.push_str(marker);
            self.out.push_str(inner);
            self.out.push_str(marker);
        }
    }

    fn push_line_break(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    /// Append a block separated from its neighbours by a blank line.
    fn push_block(&mut self, block: &str) {
        let block = block.trim_matches('\n');
        if block.trim().is_empty() {
            return;
        }
        self.trim_trailing_spaces();
        if !self.out.is_empty() {
            while !self.out.ends_with("\n\n") {
                self.out.push('\n');
            }
        }
        self.out.push_str(block);
        self.out.push_str("\n\n");
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn trim_trailing_spaces(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    /// Strip trailing spaces per line, fold blank-line runs, trim the ends.
    fn finish(self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for line in self.out.lines().map(str::trim_end) {
            if line.is_empty() && lines.last().map_or(true, |last| last.is_empty()) {
                continue;
            }
            lines.push(line);
        }
        lines.join("\n").trim().to_string()
    }
}
