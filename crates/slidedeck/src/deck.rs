use std::path::Path;

use tracing::debug;

use crate::controller::{SlideTags, Tagged};
use crate::error::DeckError;

/// One slide as loaded from a deck file. The source text is never
/// interpreted beyond pulling out a title for the window.
#[derive(Debug, Clone)]
pub struct Slide {
    pub source: String,
    pub title: Option<String>,
    /// Source text minus the title line; equals `source` when there is no title.
    pub body: String,
    tags: SlideTags,
}

impl Slide {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let (title, body) = match split_title(&source) {
            Some((title, body)) => (Some(title.to_string()), body.to_string()),
            None => (None, source.clone()),
        };
        Self {
            source,
            title,
            body,
            tags: SlideTags::default(),
        }
    }
}

impl Tagged for Slide {
    fn tags(&self) -> &SlideTags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut SlideTags {
        &mut self.tags
    }
}

pub fn load(path: &Path) -> Result<Vec<Slide>, DeckError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let slides = parse(&content);
    if slides.is_empty() {
        return Err(DeckError::NoSlides {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), slides = slides.len(), "deck loaded");
    Ok(slides)
}

pub fn parse(content: &str) -> Vec<Slide> {
    split(content).into_iter().map(Slide::new).collect()
}

/// Split a deck body into raw slide strings.
///
/// Two things break a slide:
/// 1. a `---` line with blank lines (or the file edge) on both sides
/// 2. three or more consecutive blank lines
///
/// Neither applies inside a fenced code block.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    let mut in_fence = false;

    for (i, line) in lines.iter().copied().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if in_fence {
            blank_run = 0;
            current.push(line);
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            match blank_run {
                1 | 2 => current.push(line),
                3 => flush(&mut current, &mut slides),
                _ => {}
            }
            continue;
        }
        blank_run = 0;

        if is_dash_separator(trimmed) {
            let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                flush(&mut current, &mut slides);
                continue;
            }
        }

        current.push(line);
    }
    flush(&mut current, &mut slides);

    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let chunk = current.join("\n");
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        slides.push(chunk.to_string());
    }
    current.clear();
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Only the first non-blank line can be a title. A slide opening with a
/// fence or plain text has none, so `#` lines further down stay in the body.
fn split_title(source: &str) -> Option<(&str, &str)> {
    let source = source.trim_start();
    let (first, rest) = source.split_once('\n').unwrap_or((source, ""));
    let heading = first.trim();
    if !heading.starts_with('#') {
        return None;
    }
    let title = heading.trim_start_matches('#').trim();
    if title.is_empty() {
        return None;
    }
    Some((title, rest.trim_start()))
}
