//! The two supported UI languages and every user-visible string, keyed by language.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI and query language. Serialized as its two-letter code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Am,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Am => "am",
            Language::En => "en",
        }
    }

    /// Locale tag handed to the speech recognizer.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::Am => "am-ET",
            Language::En => "en-US",
        }
    }

    /// Name of the language written in itself, as shown in the language picker.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Am => "አማርኛ",
            Language::En => "English",
        }
    }

    pub fn app_title(self) -> &'static str {
        "አማራ ሚዲያ"
    }

    pub fn app_subtitle(self) -> &'static str {
        "Amhara Media Corporation"
    }

    pub fn footer(self, year: i32) -> String {
        format!("© {} Amhara Media Corporation. All rights reserved.", year)
    }

    pub fn welcome(self) -> &'static str {
        match self {
            Language::Am => "እንኳን ደህና መጡ! ጥያቄዎን ይጠይቁ...",
            Language::En => "Welcome! Ask your question...",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Language::Am => "ጥያቄዎን ይግቡ...",
            Language::En => "Enter your question...",
        }
    }

    pub fn thinking(self) -> &'static str {
        match self {
            Language::Am => "በመመለስ ላይ...",
            Language::En => "Thinking...",
        }
    }

    pub fn send_label(self) -> &'static str {
        match self {
            Language::Am => "ላክ",
            Language::En => "Send",
        }
    }

    /// Full-pane notice shown while the server is unreachable.
    pub fn disconnected_notice(self) -> &'static str {
        match self {
            Language::Am => "ከሰርቨር ጋር መገናኘት አልተቻለም። እባክዎ ኢንተርኔት ግንኙነትዎን ያረጋግጡ።",
            Language::En => "Cannot connect to server. Please check your internet connection.",
        }
    }

    pub fn retry_label(self) -> &'static str {
        match self {
            Language::Am => "እንደገና ሞክር",
            Language::En => "Try Again",
        }
    }

    pub fn no_results(self) -> &'static str {
        match self {
            Language::Am => "ምንም አግባብነት ያለው ዜና አልተገኘም።",
            Language::En => "No relevant news found.",
        }
    }

    pub fn amharic_news_header(self) -> &'static str {
        match self {
            Language::Am => "የአማርኛ ዜናዎች:",
            Language::En => "Amharic News:",
        }
    }

    pub fn english_news_header(self) -> &'static str {
        match self {
            Language::Am => "የእንግሊዘኛ ዜናዎች:",
            Language::En => "English News:",
        }
    }

    pub fn results_summary(self, total: u64) -> String {
        match self {
            Language::Am => format!("ጠቅላላ {} ዜናዎች ተገኝተዋል።", total),
            Language::En => format!("Found {} news items.", total),
        }
    }

    /// Bot reply appended when an ask request fails. The Amharic text is a
    /// fixed phrase; the English one carries the failure detail.
    pub fn ask_failed(self, detail: &str) -> String {
        match self {
            Language::Am => "ስህተት ተከስቷል። እባክዎ ቆይተው ይሞክሩ።".to_string(),
            Language::En => format!("An error occurred: {}", detail),
        }
    }

    pub fn voice_unsupported(self) -> &'static str {
        match self {
            Language::Am => "የድምፅ ግብዓት በዚህ ብራውዘር አይደገፍም።",
            Language::En => "Voice input is not supported on this system.",
        }
    }

    pub fn voice_failed(self) -> &'static str {
        match self {
            Language::Am => "የድምፅ ግብዓት ስህተት። እባክዎ እንደገና ይሞክሩ።",
            Language::En => "Voice input error. Please try again.",
        }
    }

    pub fn voice_title(self, disabled: bool) -> &'static str {
        match (self, disabled) {
            (Language::Am, true) => "አይገኝም",
            (Language::En, true) => "Not available",
            (Language::Am, false) => "የድምፅ ግብዓት",
            (Language::En, false) => "Voice Input",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for a language code other than `am` or `en`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0} (expected \"am\" or \"en\")")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "am" => Ok(Language::Am),
            "en" => Ok(Language::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("am".parse::<Language>(), Ok(Language::Am));
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn speech_locales() {
        assert_eq!(Language::Am.speech_locale(), "am-ET");
        assert_eq!(Language::En.speech_locale(), "en-US");
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), r#""en""#);
        let lang: Language = serde_json::from_str(r#""am""#).unwrap();
        assert_eq!(lang, Language::Am);
    }

    #[test]
    fn summary_is_localized() {
        assert_eq!(Language::Am.results_summary(2), "ጠቅላላ 2 ዜናዎች ተገኝተዋል።");
        assert_eq!(Language::En.results_summary(7), "Found 7 news items.");
    }
}
