pub mod classify;
pub mod clean;
pub mod normalize;
pub mod sections;

use crate::profile::ProfileRecord;
use sections::SegmentStats;

/// Three-pass pipeline: raw text → lines → sections → cleaned record.
pub fn segment(raw_text: &str) -> ProfileRecord {
    segment_with_stats(raw_text).0
}

pub fn segment_with_stats(raw_text: &str) -> (ProfileRecord, SegmentStats) {
    let text = normalize::normalize(raw_text);
    sections::segment_lines_with_stats(&text.lines)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Section;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn worked_example() {
        let record = segment(
            "John Smith\nSenior Engineer\nExperience\nLed a team of 5 engineers. Reduced costs by 20%.\nEducation\nBS Computer Science",
        );
        assert_eq!(record.get(Section::Name), "John Smith");
        assert_eq!(record.get(Section::Headline), "Senior Engineer");
        assert_eq!(
            record.get(Section::Experience),
            "• Led a team of 5 engineers.\n• Reduced costs by 20%."
        );
        assert_eq!(record.get(Section::Education), "BS Computer Science");
        assert_eq!(record.get(Section::About), "");
    }

    #[test]
    fn empty_input_gives_total_empty_record() {
        let record = segment("");
        assert!(record.is_empty());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn garbage_input_never_fails() {
        for input in ["\u{0}\u{1}\u{2}", "\u{FFFD}\u{FFFD}", "\n\n\n", "....", "Experience"] {
            let record = segment(input);
            let json = serde_json::to_value(&record).unwrap();
            let obj = json.as_object().unwrap();
            assert_eq!(obj.len(), 8, "input {:?}", input);
            assert!(obj.values().all(|v| v.is_string()));
        }
    }

    #[test]
    fn short_text_is_not_an_error_here() {
        let record = segment("Hi");
        assert_eq!(record.get(Section::Name), "Hi");
    }

    #[test]
    fn linkedin_export_fixture() {
        let (record, stats) = segment_with_stats(&fixture("linkedin_export"));
        assert_eq!(record.get(Section::Name), "Jane Doe");
        assert_eq!(
            record.get(Section::Headline),
            "Staff Software Engineer at Acme Corp"
        );
        assert_eq!(
            record.get(Section::About),
            "I build reliable distributed systems and mentor engineers."
        );

        let experience = record.get(Section::Experience);
        assert_eq!(experience.lines().count(), 3, "got: {experience}");
        assert!(experience.lines().all(|l| l.starts_with("• ")));
        assert!(experience.contains("Reduced p99 latency by 40%."));

        assert_eq!(
            record.get(Section::Education),
            "Stanford University MS Computer Science"
        );
        assert_eq!(record.get(Section::Skills), "Rust Distributed Systems");
        assert_eq!(
            record.get(Section::Certifications),
            "AWS Certified Solutions Architect"
        );
        assert_eq!(record.get(Section::Languages), "English French");

        // "San Francisco Bay Area" sits between headline and first header.
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.headers, 6);
    }

    #[test]
    fn resume_fixture_with_repeated_header() {
        let record = segment(&fixture("resume_repeated_header"));
        assert_eq!(record.get(Section::Name), "Sam Lee");
        assert_eq!(record.get(Section::Headline), "");
        assert_eq!(record.get(Section::Education), "University of Toronto BASc Engineering");
        assert_eq!(record.get(Section::Skills), "Kubernetes, Terraform, Go");
    }
}
