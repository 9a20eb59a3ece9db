use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Canonical profile sections, declared in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Name,
    Headline,
    About,
    Experience,
    Education,
    Skills,
    Certifications,
    Languages,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Name,
        Section::Headline,
        Section::About,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Certifications,
        Section::Languages,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Headline => "headline",
            Self::About => "about",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Certifications => "certifications",
            Self::Languages => "languages",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Headline => "Headline",
            Self::About => "About",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Certifications => "Certifications",
            Self::Languages => "Languages",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Total mapping from every [`Section`] to its cleaned content.
///
/// Sections that were never detected hold an empty string, so lookups never
/// miss and serialization always emits all eight keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    fields: [String; 8],
}

impl ProfileRecord {
    pub fn get(&self, section: Section) -> &str {
        &self.fields[section.index()]
    }

    pub fn set(&mut self, section: Section, value: impl Into<String>) {
        self.fields[section.index()] = value.into();
    }

    #[cfg(test)]
    pub fn with(mut self, section: Section, value: impl Into<String>) -> Self {
        self.set(section, value);
        self
    }

    /// Sections and their content in canonical order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> + '_ {
        Section::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    pub fn filled(&self) -> impl Iterator<Item = Section> + '_ {
        self.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(section, _)| section)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }
}

impl Serialize for ProfileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Section::ALL.len()))?;
        for (section, value) in self.iter() {
            map.serialize_entry(section.key(), value)?;
        }
        map.end()
    }
}
