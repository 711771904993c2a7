//! Best-effort preamble extraction.
//!
//! Model-written LaTeX usually arrives as a full document. Before it is
//! re-assembled by [`crate::document::LatexDocument`], the document class,
//! the `document` environment markers, and every `\usepackage` are lifted out
//! of the text. This is a line-local scanner in the spirit of a regex
//! (`\cmd[opts]{arg}` with no newline inside the brackets), not a TeX parser:
//! commented-out declarations are stripped too.

use std::fmt;

use worksheet_core::reply::strip_code_fence;

const BEGIN_DOCUMENT: &str = "\\begin{document}";
const END_DOCUMENT: &str = "\\end{document}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentClass {
    pub name: String,
    pub options: Vec<String>,
}

impl DocumentClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\documentclass{}{{{}}}", bracketed(&self.options), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub options: Vec<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\usepackage{}{{{}}}", bracketed(&self.options), self.name)
    }
}

fn bracketed(options: &[String]) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!("[{}]", options.join(","))
    }
}

/// Markup split into the pieces a document is rebuilt from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// First `\documentclass` found, if any.
    pub class: Option<DocumentClass>,
    /// Every package declared, in order. `\usepackage{a,b}` yields two.
    pub packages: Vec<Package>,
    /// What is left once the declarations and document markers are removed.
    pub body: String,
}

impl Preamble {
    pub fn split(markup: &str) -> Self {
        let markup = strip_code_fence(markup);

        let (without_class, classes) = remove_command(markup, "documentclass");
        let class = classes.into_iter().next().map(|m| DocumentClass {
            name: m.argument.trim().to_string(),
            options: split_list(m.options.unwrap_or_default()),
        });

        let without_markers = without_class
            .replace(BEGIN_DOCUMENT, "")
            .replace(END_DOCUMENT, "");

        let (body, declarations) = remove_command(&without_markers, "usepackage");
        let packages = declarations
            .into_iter()
            .flat_map(|m| {
                let options = split_list(m.options.unwrap_or_default());
                split_list(m.argument)
                    .into_iter()
                    .map(move |name| Package {
                        name,
                        options: options.clone(),
                    })
            })
            .collect();

        Preamble {
            class,
            packages,
            body: body.trim().to_string(),
        }
    }
}

/// Wrap markup so it compiles on its own.
///
/// Adds a default class and base packages when no `\documentclass` is
/// present, opens the `document` environment after the preamble when
/// `\begin{document}` is missing, and closes it when `\end{document}` is
/// missing. Markup that is already a full document is returned unchanged
/// apart from fence stripping.
pub fn standalone_source(markup: &str, default_class: &str) -> String {
    let markup = strip_code_fence(markup);
    let has_class = markup.contains("\\documentclass");
    let has_begin = markup.contains(BEGIN_DOCUMENT);
    let has_end = markup.contains(END_DOCUMENT);

    let mut source = String::with_capacity(markup.len() + 128);

    if !has_class {
        source.push_str(&format!(
            "\\documentclass{{{default_class}}}\n\\usepackage{{amsmath,amssymb,graphicx}}\n"
        ));
    }

    if has_begin {
        source.push_str(markup);
    } else {
        let split = if has_class { preamble_end(markup) } else { 0 };
        let (head, tail) = markup.split_at(split);
        source.push_str(head);
        if !head.is_empty() && !head.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(BEGIN_DOCUMENT);
        source.push('\n');
        source.push_str(tail.trim_start_matches('\n'));
    }

    if !has_end {
        if !source.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(END_DOCUMENT);
    }
    source.push('\n');

    source
}

/// Byte offset just past the last line that declares the class or a package.
fn preamble_end(markup: &str) -> usize {
    let mut offset = 0;
    let mut end = 0;
    for line in markup.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim_start();
        if trimmed.starts_with("\\documentclass") || trimmed.starts_with("\\usepackage") {
            end = offset;
        }
    }
    end
}

/// One `\name[options]{argument}` occurrence.
#[derive(Debug)]
struct CommandMatch<'a> {
    start: usize,
    end: usize,
    options: Option<&'a str>,
    argument: &'a str,
}

/// Remove every occurrence of `\name[options]{argument}`, returning the
/// remaining text and the matches in order.
fn remove_command<'a>(text: &'a str, name: &str) -> (String, Vec<CommandMatch<'a>>) {
    let matches = find_commands(text, name);

    let mut remaining = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in &matches {
        remaining.push_str(&text[cursor..m.start]);
        cursor = m.end;
    }
    remaining.push_str(&text[cursor..]);

    (remaining, matches)
}

fn find_commands<'a>(text: &'a str, name: &str) -> Vec<CommandMatch<'a>> {
    let needle = format!("\\{name}");
    let mut matches = Vec::new();
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(&needle) {
        let start = search_from + found;
        let after_name = start + needle.len();
        match parse_arguments(text, after_name) {
            Some((options, argument, end)) => {
                matches.push(CommandMatch {
                    start,
                    end,
                    options,
                    argument,
                });
                search_from = end;
            }
            None => search_from = after_name,
        }
    }

    matches
}

/// Parse `[options]{argument}` starting at `pos`. Neither group may span a
/// line. Returns the groups and the offset just past the closing brace.
fn parse_arguments(text: &str, pos: usize) -> Option<(Option<&str>, &str, usize)> {
    let mut pos = pos;
    let mut options = None;

    if text[pos..].starts_with('[') {
        let (inner, next) = delimited(text, pos + 1, ']')?;
        options = Some(inner);
        pos = next;
    }

    if !text[pos..].starts_with('{') {
        return None;
    }
    let (argument, end) = delimited(text, pos + 1, '}')?;
    Some((options, argument, end))
}

/// Text from `pos` up to the first `close` on the same line.
fn delimited(text: &str, pos: usize, close: char) -> Option<(&str, usize)> {
    let rest = &text[pos..];
    let close_at = rest.find(close)?;
    let inner = &rest[..close_at];
    if inner.contains('\n') {
        return None;
    }
    Some((inner, pos + close_at + close.len_utf8()))
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
