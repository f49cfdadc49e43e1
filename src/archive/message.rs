// src/archive/message.rs
// =============================================================================
// This module splits one archived mail (an MHonArc HTML page) into its
// labeled sections and recovers the subject and the message body.
//
// MHonArc leaves comment markers in the page, one per line:
//   <!--X-Subject: PATCH: fix the frobnicator -->   the mail's subject
//   <!--X-Head-of-Message-->                         a section starts here
//   <!--X-Body-of-Message-->                         the body starts here
//
// How it works:
// 1. Walk the page line by line, remembering which section we're in
// 2. Marker lines switch sections (or record the subject) and are dropped
// 3. Every other line is appended to the current section's text
// 4. The body is the "Body-of-Message" section minus its <PRE> wrapper
//
// Rust concepts:
// - OnceLock: Compile each regex once and reuse it
// - Option<T>: A missing subject or body is "absent", not an error
// =============================================================================

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Section that holds everything before the first marker.
pub const PREAMBLE: &str = "preamble";

/// Section that holds the mail body.
pub const BODY_SECTION: &str = "Body-of-Message";

const BODY_PREFIX: &str = "<PRE>\n";
const BODY_SUFFIX: &str = "\n</PRE>\n\n";

fn subject_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<!--X-Subject: (.*) -->$").expect("valid subject regex"))
}

fn section_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<!--X-([A-Za-z-]+)-->$").expect("valid section regex"))
}

// One named section and the text collected for it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    text: String,
}

/// Ordered mapping from section name to accumulated text.
///
/// Sections keep the order in which the document first mentions them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    fn new() -> Self {
        Self {
            sections: vec![Section {
                name: PREAMBLE.to_string(),
                text: String::new(),
            }],
        }
    }

    /// Scans a document top to bottom.
    ///
    /// Returns the sections plus the subject, if a subject marker was seen.
    pub fn scan(document: &str) -> (Self, Option<String>) {
        let mut map = Self::new();
        // Index of the "current" section; there is always exactly one
        let mut current = 0;
        let mut subject = None;

        for line in document.lines() {
            if let Some(caps) = subject_marker().captures(line) {
                subject = Some(caps[1].to_string());
                continue;
            }

            if let Some(caps) = section_marker().captures(line) {
                current = map.enter(&caps[1]);
                continue;
            }

            let text = &mut map.sections[current].text;
            text.push_str(line);
            text.push('\n');
        }

        (map, subject)
    }

    // Makes `name` current, creating an empty entry the first time we see it
    fn enter(&mut self, name: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|s| s.name == name) {
            return index;
        }
        self.sections.push(Section {
            name: name.to_string(),
            text: String::new(),
        });
        self.sections.len() - 1
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.text.as_str())
    }

    /// Section names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    // Always false: the preamble section exists from the start
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Subject and body recovered from one archived mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// The subject from the X-Subject marker, if the page had one
    pub subject: Option<String>,
    /// The unwrapped body, or None when the page has no body section
    pub body: Option<String>,
}

// Segments an archived mail into (subject, body)
//
// Parameters:
//   document: the raw HTML of one archived mail
//
// Returns: Message with both parts optional
//
// A page without a "Body-of-Message" section yields body = None, the
// caller decides whether that matters.
pub fn segment(document: &str) -> Message {
    let (sections, subject) = SectionMap::scan(document);
    let body = sections.get(BODY_SECTION).map(unwrap_pre);

    Message { subject, body }
}

// Strips the <PRE>...</PRE> wrapper, but only when it is there verbatim
fn unwrap_pre(body: &str) -> String {
    let body = body.strip_prefix(BODY_PREFIX).unwrap_or(body);
    let body = body.strip_suffix(BODY_SUFFIX).unwrap_or(body);
    body.to_string()
}
