use crate::profile::Section;

/// Lowercase marker phrases per body section, in classification order.
///
/// Matching is by substring, so "Work Experience", "Professional Experience"
/// and "Employment History" all open the experience section. The flip side is
/// that body lines mentioning a marker word are read as headers too.
pub const SECTION_MARKERS: &[(Section, &[&str])] = &[
    (Section::About, &["about", "summary", "profile"]),
    (
        Section::Experience,
        &["experience", "employment", "work history", "career history"],
    ),
    (Section::Education, &["education", "academic"]),
    (Section::Skills, &["skills", "expertise", "competencies"]),
    (
        Section::Certifications,
        &["certification", "certificates", "licenses"],
    ),
    (Section::Languages, &["languages"]),
];

/// Header detection for one line: the first section (in table order) with a
/// marker contained in the lower-cased line.
pub fn classify(line: &str) -> Option<Section> {
    let lower = line.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    SECTION_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(section, _)| *section)
}
