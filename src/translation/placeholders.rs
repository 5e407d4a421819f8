/*!
 * Placeholder protection for machine translation.
 *
 * Template placeholders such as `{name}` would otherwise be translated,
 * reordered or mangled by the provider. Before sending, each placeholder is
 * replaced by its positional token `{0}`, `{1}`, ...; after translation each
 * token is swapped back for the original placeholder.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `{` + one or more non-`}` characters + `}`
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]+\}").unwrap());

/// Positional token emitted by `neutralize`
static POSITIONAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// All placeholders of `text`, left to right, duplicates included
pub fn extract(text: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replace the i-th placeholder occurrence with `{i}`
pub fn neutralize(text: &str) -> String {
    let mut index = 0;
    PLACEHOLDER_REGEX
        .replace_all(text, |_: &Captures| {
            let token = format!("{{{}}}", index);
            index += 1;
            token
        })
        .into_owned()
}

/// Put the original placeholders back into a translated text.
///
/// For every slot `i` only the first `{i}` token of the translated text is
/// replaced. Substituted placeholders are not re-examined, so a placeholder
/// that itself looks like `{3}` cannot be consumed by a later slot. Slots
/// whose token is missing stay unresolved; see `unresolved_slots`.
pub fn restore(translated: &str, placeholders: &[String]) -> String {
    let mut used = vec![false; placeholders.len()];
    POSITIONAL_REGEX
        .replace_all(translated, |caps: &Captures| {
            let token = &caps[0];
            match slot_of(&caps[1]) {
                Some(slot) if slot < placeholders.len() && !used[slot] => {
                    used[slot] = true;
                    placeholders[slot].clone()
                }
                _ => token.to_string(),
            }
        })
        .into_owned()
}

/// Slots whose `{i}` token does not appear in the translated text
pub fn unresolved_slots(translated: &str, placeholder_count: usize) -> Vec<usize> {
    let mut seen = vec![false; placeholder_count];
    for caps in POSITIONAL_REGEX.captures_iter(translated) {
        if let Some(slot) = slot_of(&caps[1]) {
            if slot < placeholder_count {
                seen[slot] = true;
            }
        }
    }
    seen.iter()
        .enumerate()
        .filter(|(_, found)| !**found)
        .map(|(slot, _)| slot)
        .collect()
}

/// Parse a positional token body, rejecting forms such as `01`
fn slot_of(digits: &str) -> Option<usize> {
    let slot: usize = digits.parse().ok()?;
    (slot.to_string() == digits).then_some(slot)
}
