//! Language resolution.
//!
//! A request carries an ordered, q-weighted list of language preferences.
//! A resource carries the set of locales it has authored content for, plus
//! an authored default. Resolution picks the single locale to render.
//!
//! Fallback always targets the resource's own default locale. A preference
//! list of `nn-NO, nn, ..., en;q=0.5` against a resource authored only in
//! `nb` resolves to `nb`, not `en`: a lower-weighted preference that
//! happens to be available never overrides the authored default. This is
//! a product decision exercised by the contract suite, not RFC 4647
//! lookup.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A language tag such as `en`, `nb` or `en-GB`.
///
/// The primary subtag is normalized to lowercase and the region to
/// uppercase, so parsed tags compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag {
    language: String,
    region: Option<String>,
}

impl LanguageTag {
    /// Build a tag from known-good parts, normalizing case.
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    /// Parse a BCP 47-style tag. Subtags beyond language and region
    /// (scripts, variants) are ignored. Returns `None` for tags whose
    /// language subtag is not 2-3 ASCII letters.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next()?.to_ascii_lowercase();
        if language.len() < 2 || language.len() > 3 {
            return None;
        }
        if !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let region = parts
            .find(|part| {
                (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                    || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|part| part.to_ascii_uppercase());

        Some(Self { language, region })
    }

    /// The leading language component, e.g. `en` for `en-GB`.
    pub fn primary(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for LanguageTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("not a valid language tag: '{s}'"))
    }
}

/// One entry of a parsed Accept-Language header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// `None` is the `*` wildcard: any language is acceptable.
    pub tag: Option<LanguageTag>,
    pub weight: f32,
}

/// The set of locales a resource has authored content for.
///
/// Read-only during resolution; built once per resource lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailableLocales(Vec<LanguageTag>);

impl AvailableLocales {
    pub fn new(tags: Vec<LanguageTag>) -> Self {
        Self(tags)
    }

    pub fn contains(&self, tag: &LanguageTag) -> bool {
        self.0.contains(tag)
    }

    /// First available tag whose primary subtag matches.
    pub fn find_primary(&self, primary: &str) -> Option<&LanguageTag> {
        self.0.iter().find(|tag| tag.primary() == primary)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageTag> {
        self.0.iter()
    }
}

impl FromIterator<LanguageTag> for AvailableLocales {
    fn from_iter<I: IntoIterator<Item = LanguageTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The locale chosen for a response. `tag` is always a member of the
/// available set (or the default when `is_fallback` is set).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocale {
    pub tag: LanguageTag,
    pub is_fallback: bool,
}

/// Parse an Accept-Language header value into an ordered preference list.
///
/// Entries without an explicit weight default to 1.0. Entries that fail to
/// parse (bad tag, bad weight) are skipped, so a malformed header degrades
/// to the empty preference list and never errors.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    header
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let (tag_part, weight) = match entry.split_once(';') {
                Some((tag_part, params)) => (tag_part.trim(), parse_weight(params)?),
                None => (entry, 1.0),
            };

            let tag = if tag_part == "*" {
                None
            } else {
                Some(LanguageTag::parse(tag_part)?)
            };

            Some(LanguagePreference { tag, weight })
        })
        .collect()
}

fn parse_weight(params: &str) -> Option<f32> {
    match params
        .split(';')
        .find_map(|param| param.trim().strip_prefix("q="))
    {
        Some(value) => {
            let weight: f32 = value.trim().parse().ok()?;
            (weight.is_finite() && (0.0..=1.0).contains(&weight)).then_some(weight)
        }
        None => Some(1.0),
    }
}

/// Resolve the locale to render for a resource.
///
/// 1. Empty preference list: the authored default, not a fallback.
/// 2. Preferences ordered by descending weight (stable on ties).
/// 3. First exact match against the available set wins.
/// 4. Then first primary-subtag match (`en-GB` is satisfied by `en`);
///    the returned tag is the available one.
/// 5. Otherwise the authored default, flagged as a fallback.
pub fn resolve_locale(
    preferences: &[LanguagePreference],
    available: &AvailableLocales,
    default: &LanguageTag,
) -> ResolvedLocale {
    if preferences.is_empty() {
        return ResolvedLocale {
            tag: default.clone(),
            is_fallback: false,
        };
    }

    let mut ordered: Vec<&LanguagePreference> = preferences.iter().collect();
    ordered.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
    });

    for preference in &ordered {
        match &preference.tag {
            Some(tag) if available.contains(tag) => {
                return ResolvedLocale {
                    tag: tag.clone(),
                    is_fallback: false,
                };
            }
            // The wildcard accepts anything, so the authored default
            // satisfies it as long as the default is actually authored.
            None if available.contains(default) => {
                return ResolvedLocale {
                    tag: default.clone(),
                    is_fallback: false,
                };
            }
            _ => {}
        }
    }

    for preference in &ordered {
        if let Some(tag) = &preference.tag {
            if let Some(found) = available.find_primary(tag.primary()) {
                return ResolvedLocale {
                    tag: found.clone(),
                    is_fallback: false,
                };
            }
        }
    }

    ResolvedLocale {
        tag: default.clone(),
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LanguageTag {
        LanguageTag::parse(s).unwrap()
    }

    fn available(tags: &[&str]) -> AvailableLocales {
        tags.iter().map(|t| tag(t)).collect()
    }

    // --- tag parsing ---

    #[test]
    fn parse_plain_language() {
        let t = tag("en");
        assert_eq!(t.primary(), "en");
        assert_eq!(t.region(), None);
        assert_eq!(t.to_string(), "en");
    }

    #[test]
    fn parse_language_with_region() {
        let t = tag("en-gb");
        assert_eq!(t.primary(), "en");
        assert_eq!(t.region(), Some("GB"));
        assert_eq!(t.to_string(), "en-GB");
    }

    #[test]
    fn parse_ignores_script_subtag() {
        let t = tag("zh-Hans-CN");
        assert_eq!(t.primary(), "zh");
        assert_eq!(t.region(), Some("CN"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(LanguageTag::parse("").is_none());
        assert!(LanguageTag::parse("x").is_none());
        assert!(LanguageTag::parse("1234").is_none());
        assert!(LanguageTag::parse("toolong").is_none());
    }

    #[test]
    fn tags_compare_case_insensitively() {
        assert_eq!(tag("EN-gb"), tag("en-GB"));
    }

    // --- header parsing ---

    #[test]
    fn parse_header_with_weights() {
        let prefs =
            parse_accept_language("en-GB,en;q=0.9,nb-NO;q=0.8,nb;q=0.7,en-US;q=0.6,da;q=0.5");
        assert_eq!(prefs.len(), 6);
        assert_eq!(prefs[0].tag, Some(tag("en-GB")));
        assert_eq!(prefs[0].weight, 1.0);
        assert_eq!(prefs[1].weight, 0.9);
        assert_eq!(prefs[5].tag, Some(tag("da")));
    }

    #[test]
    fn parse_header_skips_malformed_entries() {
        let prefs = parse_accept_language("en;q=banana,nb;q=0.8,;;,x");
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].tag, Some(tag("nb")));
    }

    #[test]
    fn parse_header_fully_malformed_is_empty() {
        assert!(parse_accept_language(";;;").is_empty());
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language("en;q=2.0").is_empty());
    }

    #[test]
    fn parse_header_wildcard() {
        let prefs = parse_accept_language("*");
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].tag, None);
    }

    // --- resolution scenarios ---

    #[test]
    fn empty_preferences_get_default_without_fallback() {
        let resolved = resolve_locale(&[], &available(&["nb"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn english_request_against_bokmaal_only_falls_back() {
        let prefs = parse_accept_language("en-GB;q=0.9,en;q=0.8");
        let resolved = resolve_locale(&prefs, &available(&["nb"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(resolved.is_fallback);
    }

    #[test]
    fn english_request_against_bokmaal_and_english_matches() {
        let prefs = parse_accept_language("en-GB;q=0.9,en;q=0.8");
        let resolved = resolve_locale(&prefs, &available(&["nb", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("en"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn nynorsk_request_falls_back_to_default_not_lower_weighted_english() {
        let prefs = parse_accept_language("nn-NO;q=0.9,nn;q=0.8,da;q=0.6,de;q=0.5");
        let resolved = resolve_locale(&prefs, &available(&["nb"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(resolved.is_fallback);

        let prefs = parse_accept_language("nn-NO;q=0.9,nn;q=0.8,en;q=0.5");
        let resolved = resolve_locale(&prefs, &available(&["nb"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(resolved.is_fallback);
    }

    #[test]
    fn bokmaal_request_matches_without_fallback() {
        let prefs = parse_accept_language("nb-NO;q=0.9,nb;q=0.8,no;q=0.7");
        let resolved = resolve_locale(&prefs, &available(&["nb", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn primary_subtag_match_returns_the_available_tag() {
        let prefs = parse_accept_language("en-GB");
        let resolved = resolve_locale(&prefs, &available(&["nb", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("en"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn highest_weight_wins_regardless_of_header_order() {
        let prefs = parse_accept_language("en;q=0.5,nn;q=0.9");
        let resolved = resolve_locale(&prefs, &available(&["nn", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nn"));
    }

    #[test]
    fn ties_keep_header_order() {
        let prefs = parse_accept_language("nn;q=0.8,en;q=0.8");
        let resolved = resolve_locale(&prefs, &available(&["nn", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nn"));
    }

    #[test]
    fn wildcard_accepts_the_default() {
        let prefs = parse_accept_language("*");
        let resolved = resolve_locale(&prefs, &available(&["nb", "en"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn wildcard_after_unavailable_tag_still_accepts_default() {
        let prefs = parse_accept_language("de,*;q=0.5");
        let resolved = resolve_locale(&prefs, &available(&["nb"]), &tag("nb"));
        assert_eq!(resolved.tag, tag("nb"));
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn resolved_tag_is_always_available_or_default() {
        let prefs = parse_accept_language("de-DE,fr;q=0.9,es;q=0.3");
        let avail = available(&["nb", "nn"]);
        let resolved = resolve_locale(&prefs, &avail, &tag("nb"));
        assert!(avail.contains(&resolved.tag));
        assert!(resolved.is_fallback);
    }

    #[test]
    fn resolution_is_idempotent() {
        let prefs = parse_accept_language("nn-NO,nn;q=0.9,en;q=0.5");
        let avail = available(&["nb", "en"]);
        let first = resolve_locale(&prefs, &avail, &tag("nb"));
        let second = resolve_locale(&prefs, &avail, &tag("nb"));
        assert_eq!(first, second);
    }
}
