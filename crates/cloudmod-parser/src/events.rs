//! Structural event stream
//!
//! The parser consumes a forward-only cursor of YAML structure events with
//! positions. Any tokenizer can feed it; [`crate::yaml`] adapts yaml-rust2.

use crate::error::{ParseError, Result};
use cloudmod_core::SourceLocation;

/// 1-based position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Mark {
    pub line: usize,
    pub column: usize,
}

impl Mark {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One structural event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingEvent {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart { tag: Option<String> },
    MappingEnd,
    SequenceStart { tag: Option<String> },
    SequenceEnd,
    Scalar { value: String, tag: Option<String> },
}

impl ParsingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ParsingEvent::StreamStart => "stream start",
            ParsingEvent::StreamEnd => "stream end",
            ParsingEvent::DocumentStart => "document start",
            ParsingEvent::DocumentEnd => "document end",
            ParsingEvent::MappingStart { .. } => "map",
            ParsingEvent::MappingEnd => "map end",
            ParsingEvent::SequenceStart { .. } => "sequence",
            ParsingEvent::SequenceEnd => "sequence end",
            ParsingEvent::Scalar { .. } => "scalar",
        }
    }

    /// Tag of a mapping, sequence or scalar event
    pub fn tag(&self) -> Option<&str> {
        match self {
            ParsingEvent::MappingStart { tag }
            | ParsingEvent::SequenceStart { tag }
            | ParsingEvent::Scalar { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }
}

/// Event with its source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedEvent {
    pub event: ParsingEvent,
    pub start: Mark,
    pub end: Mark,
}

impl MarkedEvent {
    pub fn new(event: ParsingEvent, start: Mark, end: Mark) -> Self {
        Self { event, start, end }
    }

    pub fn location(&self, file_path: &str) -> SourceLocation {
        SourceLocation::new(
            file_path,
            (self.start.line, self.start.column),
            (self.end.line, self.end.column),
        )
    }
}

/// Forward-only cursor over structural events
pub trait EventStream {
    /// Event at the cursor, `None` once the stream is exhausted
    fn current(&self) -> Option<&MarkedEvent>;

    /// Move to the next event
    fn advance(&mut self);

    /// Skip the current event and, if it opens a container, everything up to
    /// and including the matching close event.
    ///
    /// A close or framing event at the cursor is left in place, so skipping
    /// never leaves the enclosing construct.
    fn skip_this_and_nested(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let event = self.current().ok_or(ParseError::UnexpectedEndOfStream)?;
            match event.event {
                ParsingEvent::MappingStart { .. } | ParsingEvent::SequenceStart { .. } => {
                    depth += 1;
                }
                ParsingEvent::MappingEnd | ParsingEvent::SequenceEnd => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                ParsingEvent::Scalar { .. } => {}
                ParsingEvent::StreamStart
                | ParsingEvent::StreamEnd
                | ParsingEvent::DocumentStart
                | ParsingEvent::DocumentEnd => {
                    if depth == 0 {
                        return Ok(());
                    }
                    return Err(ParseError::UnexpectedEndOfStream);
                }
            }
            self.advance();
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

/// Event stream over a buffered list of events
#[derive(Debug, Clone, Default)]
pub struct EventCursor {
    events: Vec<MarkedEvent>,
    position: usize,
}

impl EventCursor {
    pub fn new(events: Vec<MarkedEvent>) -> Self {
        Self {
            events,
            position: 0,
        }
    }

    /// Number of events not yet consumed
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.position)
    }
}

impl EventStream for EventCursor {
    fn current(&self) -> Option<&MarkedEvent> {
        self.events.get(self.position)
    }

    fn advance(&mut self) {
        if self.position < self.events.len() {
            self.position += 1;
        }
    }
}

impl FromIterator<MarkedEvent> for EventCursor {
    fn from_iter<I: IntoIterator<Item = MarkedEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
