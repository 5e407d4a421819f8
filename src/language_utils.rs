/*!
 * Language utilities for locale code handling.
 *
 * Locale codes are BCP 47 style tags such as `en`, `pt-BR` or `zh-Hans`.
 * Only the primary subtag is checked against ISO 639; region and script
 * subtags are passed through to the provider untouched.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Primary language subtag of a locale code, lowercased
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Validate that a locale code starts with an ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<()> {
    let primary = primary_subtag(code);

    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };

    if known {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Normalize a locale code: lowercase language, `-` separator, uppercase region.
///
/// `pt_br` becomes `pt-BR`, `zh-hans` becomes `zh-Hans`.
pub fn normalize_locale(code: &str) -> String {
    let mut parts = code.trim().split(['-', '_']);
    let mut normalized = parts.next().unwrap_or_default().to_lowercase();

    for part in parts {
        normalized.push('-');
        match part.len() {
            // Script subtag
            4 => {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    normalized.extend(first.to_uppercase());
                    normalized.push_str(&chars.as_str().to_lowercase());
                }
            }
            _ => normalized.push_str(&part.to_uppercase()),
        }
    }

    normalized
}

/// Code expected by the provider for a target language (`pt-BR` -> `PT-BR`)
pub fn to_provider_target_code(code: &str) -> String {
    normalize_locale(code).to_uppercase()
}

/// Code expected by the provider for a source language; regional variants are not accepted there
pub fn to_provider_source_code(code: &str) -> String {
    primary_subtag(code).to_uppercase()
}

/// Check if two locale codes refer to the same locale
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    normalize_locale(code1).eq_ignore_ascii_case(&normalize_locale(code2))
}

/// Get the English name of the language of a locale code
pub fn get_language_name(code: &str) -> Result<String> {
    let primary = primary_subtag(code);

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
