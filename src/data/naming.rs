//! Name transforms between export owners, file stems and display names.

/// Export owners whose display name is not derivable from the owner string.
const DISPLAY_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Longsword_Argon_Citadel", "Argon's Sword"),
    ("Greatsword_Malric", "Lion's Bane"),
    ("Carryable_Candelabra", "Candelabra"),
];

pub fn display_name_override(raw: &str) -> Option<&'static str> {
    DISPLAY_NAME_OVERRIDES
        .iter()
        .find(|(owner, _)| *owner == raw)
        .map(|(_, display)| *display)
}

/// `LongSword` -> `long_sword`. Every uppercase letter after the first character
/// gets an underscore, existing underscores included.
pub fn file_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `LongSword` -> `Long Sword`, with doubled spaces collapsed.
pub fn pascal_to_space(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.replace("  ", " ")
}

/// Human-readable name for a raw export owner.
pub fn display_name(raw: &str) -> String {
    pascal_to_space(display_name_override(raw).unwrap_or(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_snake_case() {
        assert_eq!(file_stem("LongSword"), "long_sword");
        assert_eq!(file_stem("Messer"), "messer");
        assert_eq!(file_stem("Longsword_Argon_Citadel"), "longsword__argon__citadel");
    }

    #[test]
    fn display_names_are_spaced() {
        assert_eq!(display_name("LongSword"), "Long Sword");
        assert_eq!(display_name("Long Sword"), "Long Sword");
        assert_eq!(display_name("Greatsword_Malric"), "Lion's Bane");
        assert_eq!(display_name("Longsword_Argon_Citadel"), "Argon's Sword");
    }
}
