//! File name and id grammar.
//!
//! A resource file is named `<name>.<type_or_domain>.<locale>.json` where
//!
//! - `name` and `type_or_domain` match `[\w-]+`
//! - `locale` matches `\w+` (`en`, `pl_PL`)
//!
//! `\w` is the ASCII word class here. Anything else in a store directory is
//! ignored when listing.

use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceId, ResourceKind, TRANSLATION_DOMAIN};
use once_cell::sync::Lazy;
use regex::Regex;

pub const FILE_EXTENSION: &str = "json";

static SLUG_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug pattern compiles"));

static LOCALE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("locale pattern compiles"));

static FILE_STEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9_-]+)\.(?P<type_or_domain>[A-Za-z0-9_-]+)\.(?P<locale>[A-Za-z0-9_]+)$",
    )
    .expect("file stem pattern compiles")
});

fn stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(FILE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
}

/// Cheap grammar check used while listing; builds nothing.
pub fn is_valid_name(file_name: &str) -> bool {
    stem(file_name).is_some_and(|s| FILE_STEM.is_match(s))
}

/// Parses a file name into the identity it encodes.
pub fn parse_file_name(file_name: &str) -> Result<ResourceId> {
    let invalid = || StoreError::InvalidFilename(file_name.to_string());
    let stem = stem(file_name).ok_or_else(invalid)?;
    let caps = FILE_STEM.captures(stem).ok_or_else(invalid)?;
    Ok(ResourceId {
        name: caps["name"].to_string(),
        type_or_domain: caps["type_or_domain"].to_string(),
        locale: caps["locale"].to_string(),
    })
}

/// Parses a public id (`name.type.locale`).
pub fn parse_id(id: &str) -> Result<ResourceId> {
    let parts: Vec<&str> = id.split('.').collect();
    let [name, type_or_domain, locale] = parts.as_slice() else {
        return Err(StoreError::InvalidIdentity(id.to_string()));
    };
    let parsed = ResourceId {
        name: name.to_string(),
        type_or_domain: type_or_domain.to_string(),
        locale: locale.to_string(),
    };
    validate_id(&parsed)?;
    Ok(parsed)
}

pub fn validate_id(id: &ResourceId) -> Result<()> {
    let valid = SLUG_PART.is_match(&id.name)
        && SLUG_PART.is_match(&id.type_or_domain)
        && LOCALE_PART.is_match(&id.locale);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentity(id.to_string()))
    }
}

/// Resolves a public id for the given kind. Translations only live in the
/// `editor` domain.
pub fn resolve(kind: ResourceKind, id: &str) -> Result<ResourceHandle> {
    let parsed = parse_id(id)?;
    if kind == ResourceKind::Translation && parsed.type_or_domain != TRANSLATION_DOMAIN {
        return Err(StoreError::InvalidIdentity(format!(
            "{} (translation domain must be '{}')",
            id, TRANSLATION_DOMAIN
        )));
    }
    Ok(ResourceHandle::new(kind, parsed))
}

/// Turns a human name into the `name` part of an id.
///
/// Lowercases, folds the accented letters used by the supported locales,
/// turns whitespace and dashes into single dashes and drops everything else.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        let folded = match fold_accent(c) {
            Some(ascii) => ascii,
            None => {
                if c.is_ascii_alphanumeric() || c == '_' {
                    slug.push(c.to_ascii_lowercase());
                } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
                    slug.push('-');
                }
                continue;
            }
        };
        slug.push_str(folded);
    }
    slug.trim_matches('-').to_string()
}

fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'ą' | 'Ą' | 'á' | 'Á' | 'à' | 'À' | 'â' | 'Â' => "a",
        'ä' | 'Ä' => "a",
        'ć' | 'Ć' | 'č' | 'Č' | 'ç' | 'Ç' => "c",
        'ę' | 'Ę' | 'é' | 'É' | 'è' | 'È' | 'ê' | 'Ê' | 'ě' | 'Ě' => "e",
        'í' | 'Í' | 'î' | 'Î' => "i",
        'ł' | 'Ł' => "l",
        'ń' | 'Ń' | 'ň' | 'Ň' => "n",
        'ó' | 'Ó' | 'ö' | 'Ö' | 'ô' | 'Ô' => "o",
        'ś' | 'Ś' | 'š' | 'Š' => "s",
        'ß' => "ss",
        'ú' | 'Ú' | 'ü' | 'Ü' | 'ů' | 'Ů' => "u",
        'ý' | 'Ý' => "y",
        'ź' | 'Ź' | 'ż' | 'Ż' | 'ž' | 'Ž' => "z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_names() {
        assert!(is_valid_name("birthdays.name-day.en.json"));
        assert!(is_valid_name("poland.national-day.pl_PL.json"));
        assert!(is_valid_name("shop_2.editor.de.json"));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(!is_valid_name("birthdays.name-day.json"));
        assert!(!is_valid_name("birthdays.name-day.en"));
        assert!(!is_valid_name("birth days.name-day.en.json"));
        assert!(!is_valid_name("a.b.pl-PL.json"));
        assert!(!is_valid_name("a.b.c.d.json"));
        assert!(!is_valid_name(".tmp-123.json"));
    }

    #[test]
    fn parse_file_name_extracts_parts() {
        let id = parse_file_name("poland.national-day.pl_PL.json").unwrap();
        assert_eq!(id.name, "poland");
        assert_eq!(id.type_or_domain, "national-day");
        assert_eq!(id.locale, "pl_PL");
    }

    #[test]
    fn parse_file_name_reports_invalid() {
        let err = parse_file_name("notes.txt").unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilename(name) if name == "notes.txt"));
    }

    #[test]
    fn parse_id_requires_three_non_empty_parts() {
        assert!(parse_id("a.b.c").is_ok());
        assert!(matches!(parse_id("a.b"), Err(StoreError::InvalidIdentity(_))));
        assert!(matches!(parse_id("a..c"), Err(StoreError::InvalidIdentity(_))));
        assert!(matches!(
            parse_id("a.b.c.d"),
            Err(StoreError::InvalidIdentity(_))
        ));
        assert!(matches!(parse_id("a/b.c.d"), Err(StoreError::InvalidIdentity(_))));
    }

    #[test]
    fn resolve_enforces_translation_domain() {
        assert!(resolve(ResourceKind::Translation, "shop.editor.en").is_ok());
        assert!(matches!(
            resolve(ResourceKind::Translation, "shop.admin.en"),
            Err(StoreError::InvalidIdentity(_))
        ));
        assert!(resolve(ResourceKind::Calendar, "shop.admin.en").is_ok());
    }

    #[test]
    fn slugify_follows_title_rules() {
        assert_eq!(slugify("Birthdays"), "birthdays");
        assert_eq!(slugify("  Public  Holidays 2024 "), "public-holidays-2024");
        assert_eq!(slugify("Święta państwowe"), "swieta-panstwowe");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("we're #1!"), "were-1");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn identity_round_trips_through_file_name() {
        let id = ResourceId::new("gift_cards", "national-day", "pl_PL").unwrap();
        assert_eq!(parse_file_name(&id.file_name()).unwrap(), id);
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
