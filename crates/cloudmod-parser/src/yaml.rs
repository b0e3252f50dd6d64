//! YAML tokenizer adapter
//!
//! Runs the yaml-rust2 event parser over a source document and buffers its
//! events, with 1-based positions, into an [`EventCursor`].

use crate::error::{ParseError, Result};
use crate::events::{EventCursor, Mark, MarkedEvent, ParsingEvent};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

struct Collector {
    source: Vec<char>,
    events: Vec<MarkedEvent>,
    open: Vec<usize>,
    /// Collection start still waiting for its first child
    first_child: Option<usize>,
    error: Option<ParseError>,
}

impl Collector {
    fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            events: Vec::new(),
            open: Vec::new(),
            first_child: None,
            error: None,
        }
    }

    /// End of a scalar in the source text, one past its last character
    fn scalar_end(&self, value: &str, style: &TScalarStyle, index: usize, mark: Mark) -> Mark {
        match style {
            TScalarStyle::Plain => Mark::new(mark.line, mark.column + value.chars().count()),
            TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => {
                quoted_end(&self.source, index, mark).unwrap_or(mark)
            }
            _ => mark,
        }
    }
}

/// Find the closing quote of the quoted scalar opening at `start`
fn quoted_end(source: &[char], start: usize, mark: Mark) -> Option<Mark> {
    let quote = *source.get(start)?;
    let (mut line, mut column) = (mark.line, mark.column);
    let mut escaped = false;
    let mut chars = source.get(start + 1..)?.iter().peekable();
    while let Some(&c) = chars.next() {
        if c == '\n' {
            line += 1;
            column = 0;
            escaped = false;
            continue;
        }
        column += 1;
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quote == '"' => escaped = true,
            '\'' if quote == '\'' && chars.peek() == Some(&&'\'') => {
                chars.next();
                column += 1;
            }
            c if c == quote => return Some(Mark::new(line, column + 1)),
            _ => {}
        }
    }
    None
}

fn tag_name(tag: Tag) -> String {
    format!("{}{}", tag.handle, tag.suffix)
}

impl MarkedEventReceiver for Collector {
    fn on_event(&mut self, event: Event, marker: Marker) {
        let mark = Mark::new(marker.line(), marker.col() + 1);
        let mut end = mark;
        let event = match event {
            Event::Nothing => return,
            Event::Alias(_) => {
                if self.error.is_none() {
                    self.error = Some(ParseError::UnsupportedAlias {
                        line: mark.line,
                        column: mark.column,
                    });
                }
                return;
            }
            Event::StreamStart => ParsingEvent::StreamStart,
            Event::StreamEnd => ParsingEvent::StreamEnd,
            Event::DocumentStart { .. } => ParsingEvent::DocumentStart,
            Event::DocumentEnd => ParsingEvent::DocumentEnd,
            Event::MappingStart(_, tag) => ParsingEvent::MappingStart {
                tag: tag.map(tag_name),
            },
            Event::MappingEnd => ParsingEvent::MappingEnd,
            Event::SequenceStart(_, tag) => ParsingEvent::SequenceStart {
                tag: tag.map(tag_name),
            },
            Event::SequenceEnd => ParsingEvent::SequenceEnd,
            Event::Scalar(value, style, _, tag) => {
                end = self.scalar_end(&value, &style, marker.index(), mark);
                // plain `~` is the YAML null
                let value = if matches!(style, TScalarStyle::Plain) && value == "~" {
                    String::new()
                } else {
                    value
                };
                ParsingEvent::Scalar {
                    value,
                    tag: tag.map(tag_name),
                }
            }
        };

        // block collections are marked after their first key, so they
        // start where that first child does
        if let Some(collection) = self.first_child.take().and_then(|i| self.events.get_mut(i)) {
            if mark < collection.start {
                collection.start = mark;
            }
        }
        match event {
            ParsingEvent::MappingStart { .. } | ParsingEvent::SequenceStart { .. } => {
                self.first_child = Some(self.events.len());
                self.open.push(self.events.len());
            }
            ParsingEvent::MappingEnd | ParsingEvent::SequenceEnd => {
                if let Some(start) = self.open.pop().and_then(|i| self.events.get_mut(i)) {
                    start.end = mark;
                }
            }
            _ => {}
        }
        self.events.push(MarkedEvent::new(event, mark, end));
    }
}

/// Tokenize a YAML document into a buffered event stream
pub fn tokenize(source: &str) -> Result<EventCursor> {
    let mut collector = Collector::new(source);
    let mut parser = Parser::new(source.chars());
    parser
        .load(&mut collector, true)
        .map_err(|e| ParseError::Yaml {
            message: e.to_string(),
        })?;
    if let Some(error) = collector.error {
        return Err(error);
    }
    log::trace!("tokenized {} events", collector.events.len());
    Ok(EventCursor::new(collector.events))
}
