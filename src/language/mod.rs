use whatlang::Lang;

use crate::derive::DEFAULT_LANGUAGE;

/// Best-effort language detection over free text.
///
/// Treated as a black box by the prompt-parsing endpoint; swap the
/// implementation without touching the handlers.
pub trait LanguageDetector: Send + Sync {
    /// Returns an ISO 639-1 code, falling back to "en" when detection
    /// fails or the language has no mapping.
    fn detect(&self, text: &str) -> String;
}

/// Default detector backed by whatlang's trigram classifier.
#[derive(Debug, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> String {
        match whatlang::detect_lang(text) {
            Some(lang) => iso_639_1(lang).to_string(),
            None => DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Map whatlang's ISO 639-3 identifiers onto the two-letter codes that
/// template content blocks are keyed by. Unmapped languages fall back to
/// "en" rather than producing a code no template carries.
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Hin => "hi",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        Lang::Rus => "ru",
        Lang::Ara => "ar",
        Lang::Nld => "nl",
        Lang::Swe => "sv",
        Lang::Nob => "no",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Heb => "he",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ind => "id",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Ben => "bn",
        Lang::Guj => "gu",
        Lang::Mar => "mr",
        Lang::Pan => "pa",
        Lang::Urd => "ur",
        _ => DEFAULT_LANGUAGE,
    }
}
