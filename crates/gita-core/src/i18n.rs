//! Localized interface strings. English variants share one table.

use crate::language::Language;

pub fn verse_label(language: Language) -> &'static str {
    if language.is_english() {
        "VERSE"
    } else {
        "श्लोक"
    }
}

pub fn conclusion_label(language: Language) -> &'static str {
    if language.is_english() {
        "PUSHPIKA"
    } else {
        "पुष्पिका"
    }
}

pub fn translation_label(language: Language) -> &'static str {
    if language.is_english() {
        "TRANSLATION"
    } else {
        "अनुवाद"
    }
}

pub fn translation_missing(language: Language) -> &'static str {
    if language.is_english() {
        "Translation not available."
    } else {
        "अनुवाद उपलब्ध नहीं है।"
    }
}

/// "Adhyay 2 · Verse 47"
pub fn verse_title(language: Language, chapter: u8, verse: u16) -> String {
    if language.is_english() {
        format!("Adhyay {} · Verse {}", chapter, verse)
    } else {
        format!("अध्याय {} · श्लोक {}", chapter, verse)
    }
}

/// "Adhyay 2 Pushpika"
pub fn conclusion_title(language: Language, chapter: u8) -> String {
    if language.is_english() {
        format!("Adhyay {} Pushpika", chapter)
    } else {
        format!("अध्याय {} पुष्पिका", chapter)
    }
}

pub fn conclusion_short_title(language: Language) -> &'static str {
    if language.is_english() {
        "Pushpika"
    } else {
        "पुष्पिका"
    }
}

/// Question side of an opening-phrase card
pub fn identify_prompt(language: Language) -> &'static str {
    if language.is_english() {
        "Identify the Verse"
    } else {
        "श्लोक पहचानिये"
    }
}

pub fn conclusion_prompt(language: Language) -> &'static str {
    if language.is_english() {
        "Chapter Conclusion..."
    } else {
        "अध्याय समाप्ति..."
    }
}

pub fn chapter_word(language: Language) -> &'static str {
    if language.is_english() {
        "Adhyay"
    } else {
        "अध्याय"
    }
}

pub fn practice_complete(language: Language, verses: usize) -> String {
    if language.is_english() {
        format!("Practice complete: {} verses reviewed.", verses)
    } else {
        format!("अभ्यास पूर्ण: {} श्लोक दोहराए गए।", verses)
    }
}

pub fn reading_complete(language: Language, chapter: u8) -> String {
    match language {
        Language::Hindi => format!("आपने सफलतापूर्वक अध्याय {} पूरा कर लिया है।", chapter),
        Language::EnglishIast => format!("You have completed reading Adhyāya {}.", chapter),
        Language::EnglishSanskrit => format!("You have completed reading Adhyay {}.", chapter),
    }
}

/// Toasts are always English
pub fn star_toast(starred: bool) -> &'static str {
    if starred {
        "Added to Starred List"
    } else {
        "Removed from Starred List"
    }
}

pub fn no_starred() -> &'static str {
    "No starred verses yet"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_follow_language() {
        assert_eq!(verse_title(Language::EnglishIast, 2, 47), "Adhyay 2 · Verse 47");
        assert_eq!(verse_title(Language::Hindi, 2, 47), "अध्याय 2 · श्लोक 47");
        assert_eq!(conclusion_title(Language::EnglishSanskrit, 3), "Adhyay 3 Pushpika");
    }

    #[test]
    fn test_reading_complete_variants() {
        assert_eq!(
            reading_complete(Language::EnglishIast, 4),
            "You have completed reading Adhyāya 4."
        );
        assert_eq!(
            reading_complete(Language::EnglishSanskrit, 4),
            "You have completed reading Adhyay 4."
        );
        assert!(reading_complete(Language::Hindi, 4).contains("अध्याय 4"));
    }
}
