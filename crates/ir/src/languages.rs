//! Static language lists

use lingo_core::{Language, LanguageRegistry};
use serde::{Deserialize, Serialize};

/// A language registry backed by a plain list (configuration file, tests)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageList(pub Vec<Language>);

impl LanguageList {
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        Self(languages.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl LanguageRegistry for LanguageList {
    fn languages(&self) -> Vec<Language> {
        self.0.clone()
    }
}
