use crate::verse::Translation;

/// Display language: which script the verse is shown in and which
/// translation accompanies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// Devanagari verse with Hindi translation
    #[default]
    Hindi,
    /// Devanagari verse with English translation
    EnglishSanskrit,
    /// IAST transliteration with English translation
    EnglishIast,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::EnglishSanskrit => "en_sanskrit",
            Language::EnglishIast => "en_iast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hi" => Some(Language::Hindi),
            "en_sanskrit" => Some(Language::EnglishSanskrit),
            "en_iast" => Some(Language::EnglishIast),
            _ => None,
        }
    }

    pub fn all() -> Vec<Language> {
        vec![Language::Hindi, Language::EnglishSanskrit, Language::EnglishIast]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Hindi => "हिन्दी (Sanskrit)",
            Language::EnglishSanskrit => "English (Sanskrit)",
            Language::EnglishIast => "English (IAST)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Language::Hindi => "Sanskrit shlokas + Hindi translation",
            Language::EnglishSanskrit => "Sanskrit shlokas + English translation",
            Language::EnglishIast => "Sanskrit transliteration + English translation",
        }
    }

    /// Whether UI chrome (headers, labels) is in English
    pub fn is_english(&self) -> bool {
        !matches!(self, Language::Hindi)
    }

    pub fn uses_transliteration(&self) -> bool {
        matches!(self, Language::EnglishIast)
    }

    pub fn translation(&self) -> Translation {
        match self {
            Language::Hindi => Translation::Hindi,
            Language::EnglishSanskrit | Language::EnglishIast => Translation::English,
        }
    }
}
