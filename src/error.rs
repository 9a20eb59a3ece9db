use crate::fetch::MIN_CONTENT_CHARS;

/// Collaborator failures the pipeline surfaces unchanged.
///
/// Segmentation itself never fails; these only come from fetching text or
/// generating a summary.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("fetch failed: {0}")]
    FetchFailure(String),
    #[error(
        "extracted text too short: {found} non-whitespace characters (need at least {min})",
        min = MIN_CONTENT_CHARS
    )]
    EmptyExtraction { found: usize },
    #[error("summary generation failed: {0}")]
    GenerationFailure(String),
}

impl ProfileError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FetchFailure(_) => "fetch_failure",
            Self::EmptyExtraction { .. } => "empty_extraction",
            Self::GenerationFailure(_) => "generation_failure",
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FetchFailure(_) => 2,
            Self::EmptyExtraction { .. } => 3,
            Self::GenerationFailure(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            ProfileError::FetchFailure("x".into()),
            ProfileError::EmptyExtraction { found: 3 },
            ProfileError::GenerationFailure("y".into()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(ProfileError::exit_code).collect();
        codes.dedup();
        assert_eq!(codes, vec![2, 3, 4]);
    }

    #[test]
    fn empty_extraction_message_names_threshold() {
        let msg = ProfileError::EmptyExtraction { found: 4 }.to_string();
        assert!(msg.contains("4 non-whitespace"));
        assert!(msg.contains("at least 10"));
    }
}
