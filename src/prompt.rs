use crate::profile::ProfileRecord;

pub const DEFAULT_TONE: &str = "professional";

const CLOSING_INSTRUCTION: &str = "Provide a concise summary that highlights key points and would be useful for personalized outreach.";

/// Render a record into the exact prompt handed to the summarizer.
///
/// Sections appear in canonical order and empty ones are skipped. A blank tone
/// falls back to [`DEFAULT_TONE`]; a blank context is omitted. Identical inputs
/// always produce identical bytes.
pub fn build_prompt(record: &ProfileRecord, tone: &str, context: Option<&str>) -> String {
    let tone = match tone.trim() {
        "" => DEFAULT_TONE,
        t => t,
    };

    let mut prompt = format!(
        "Create a {} summary of the following LinkedIn profile for networking purposes:\n\n",
        tone
    );

    for (section, value) in record.iter().filter(|(_, v)| !v.is_empty()) {
        if value.contains('\n') {
            prompt.push_str(&format!("{}:\n{}\n", section.label(), value));
        } else {
            prompt.push_str(&format!("{}: {}\n", section.label(), value));
        }
    }

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\nContext for summary: {}", context));
    }

    prompt.push_str("\n\n");
    prompt.push_str(CLOSING_INSTRUCTION);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Section;

    fn sample() -> ProfileRecord {
        ProfileRecord::default()
            .with(Section::Name, "John Smith")
            .with(Section::Headline, "Senior Engineer")
            .with(
                Section::Experience,
                "• Led a team of 5 engineers.\n• Reduced costs by 20%.",
            )
            .with(Section::Education, "BS Computer Science")
    }

    #[test]
    fn exact_layout() {
        let prompt = build_prompt(&sample(), "friendly", Some("Meeting at a conference"));
        let expected = "Create a friendly summary of the following LinkedIn profile for networking purposes:\n\
            \n\
            Name: John Smith\n\
            Headline: Senior Engineer\n\
            Experience:\n\
            • Led a team of 5 engineers.\n\
            • Reduced costs by 20%.\n\
            Education: BS Computer Science\n\
            \n\
            Context for summary: Meeting at a conference\n\
            \n\
            Provide a concise summary that highlights key points and would be useful for personalized outreach.";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn deterministic() {
        let a = build_prompt(&sample(), "professional", None);
        let b = build_prompt(&sample(), "professional", None);
        assert_eq!(a, b);
    }

    #[test]
    fn order_independent_of_insertion() {
        let forwards = ProfileRecord::default()
            .with(Section::Name, "Jane")
            .with(Section::Skills, "Rust")
            .with(Section::Languages, "English");
        let backwards = ProfileRecord::default()
            .with(Section::Languages, "English")
            .with(Section::Skills, "Rust")
            .with(Section::Name, "Jane");
        let prompt = build_prompt(&forwards, "casual", None);
        assert_eq!(prompt, build_prompt(&backwards, "casual", None));
        let name = prompt.find("Name:").unwrap();
        let skills = prompt.find("Skills:").unwrap();
        let languages = prompt.find("Languages:").unwrap();
        assert!(name < skills && skills < languages);
    }

    #[test]
    fn skips_empty_sections_and_blank_context() {
        let prompt = build_prompt(&sample(), "professional", Some("   "));
        assert!(!prompt.contains("About:"));
        assert!(!prompt.contains("Context for summary"));
        assert!(prompt.ends_with(&format!("Education: BS Computer Science\n\n\n{CLOSING_INSTRUCTION}")));
    }

    #[test]
    fn blank_tone_uses_default() {
        let prompt = build_prompt(&ProfileRecord::default(), "  ", None);
        assert!(prompt.starts_with("Create a professional summary"));
    }

    #[test]
    fn empty_record_still_renders() {
        let prompt = build_prompt(&ProfileRecord::default(), "professional", None);
        assert_eq!(
            prompt,
            format!(
                "Create a professional summary of the following LinkedIn profile for networking purposes:\n\n\n\n{CLOSING_INSTRUCTION}"
            )
        );
    }
}
