use tracing::trace;

use super::classify::classify;
use super::clean::clean_section;
use crate::profile::{ProfileRecord, Section};

/// Only the first lines of a document may carry the person's name.
const NAME_WINDOW: usize = 5;
const HEADLINE_MAX_WORDS: usize = 15;

/// Line accounting for one segmentation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub lines: usize,
    pub headers: usize,
    pub dropped: usize,
}

/// Per-run state. `current_section == None` is the NO_SECTION state, anything
/// else is IN_SECTION.
#[derive(Debug, Default)]
struct SegmentBuffer {
    current_section: Option<Section>,
    pending_lines: Vec<String>,
}

impl SegmentBuffer {
    /// Close the active section (if it collected anything) and start `section`.
    fn open(&mut self, section: Section, record: &mut ProfileRecord) {
        self.flush(record);
        self.current_section = Some(section);
    }

    /// A flush replaces whatever an earlier occurrence of the same header left.
    fn flush(&mut self, record: &mut ProfileRecord) {
        let Some(section) = self.current_section else {
            return;
        };
        if self.pending_lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.pending_lines);
        trace!(%section, lines = lines.len(), "flushing section");
        record.set(section, clean_section(&lines));
    }
}

/// Walk the document lines and assign each to a profile section.
pub fn segment_lines_with_stats(lines: &[String]) -> (ProfileRecord, SegmentStats) {
    let mut record = ProfileRecord::default();
    let mut buffer = SegmentBuffer::default();
    let mut stats = SegmentStats::default();
    let mut has_name = false;
    let mut headline_open = true;

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        if let Some(section) = classify(line) {
            stats.headers += 1;
            buffer.open(section, &mut record);
            continue;
        }

        if buffer.current_section.is_some() {
            buffer.pending_lines.push(line.to_string());
            continue;
        }

        // NO_SECTION: only the name and headline slots can take the line.
        if !has_name {
            if idx < NAME_WINDOW {
                record.set(Section::Name, line);
                has_name = true;
            } else {
                stats.dropped += 1;
            }
        } else if headline_open {
            headline_open = false;
            if line.split_whitespace().count() <= HEADLINE_MAX_WORDS {
                record.set(Section::Headline, line);
            } else {
                trace!(line, "headline candidate too long");
                stats.dropped += 1;
            }
        } else {
            trace!(line, "dropping line outside any section");
            stats.dropped += 1;
        }
    }

    buffer.flush(&mut record);
    (record, stats)
}
