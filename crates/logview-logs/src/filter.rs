use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Case-insensitive substring filter over rendered entry text
///
/// An empty needle matches everything.
#[derive(Clone, Default)]
pub struct TextFilter {
    /// Original needle
    needle: String,

    /// Compiled literal matcher (None for an empty needle)
    regex: Option<Regex>,

    /// Lower-cased needle, used if the matcher could not be built
    lowered: String,
}

impl TextFilter {
    /// Create a filter from the text typed by the user
    pub fn new(needle: &str) -> Self {
        let regex = if needle.is_empty() {
            None
        } else {
            // Escaped, so this is a literal substring search
            match RegexBuilder::new(&regex::escape(needle))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Falling back to plain substring filter: {}", e);
                    None
                }
            }
        };

        Self {
            needle: needle.to_string(),
            regex,
            lowered: needle.to_lowercase(),
        }
    }

    /// Check whether a rendered text should stay visible
    pub fn matches(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        match &self.regex {
            Some(re) => re.is_match(text),
            None => text.to_lowercase().contains(&self.lowered),
        }
    }

    /// Find all match positions in a string (for highlighting)
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.regex {
            Some(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            None => Vec::new(),
        }
    }

    /// Get the original needle
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

impl PartialEq for TextFilter {
    fn eq(&self, other: &Self) -> bool {
        self.needle == other.needle
    }
}

impl std::fmt::Debug for TextFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFilter")
            .field("needle", &self.needle)
            .finish()
    }
}
