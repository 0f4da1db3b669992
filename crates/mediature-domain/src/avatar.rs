//! Avatar initials and color derivation.
//!
//! Ports the legacy frontend algorithm bit-for-bit so avatars rendered from
//! server data keep the colors users already know. The hash works on UTF-16
//! code units with 32-bit wrapping arithmetic, matching JavaScript
//! `charCodeAt` semantics.

/// Extract at most two uppercase initials from a full name.
///
/// Name parts are split on spaces and hyphens. When more than three parts
/// contribute an initial and at least one initial is an ASCII capital,
/// lowercase initials (particles like "de", "la") are dropped first.
pub fn extract_initials(full_name: &str) -> String {
    let mut initials: String = full_name
        .split([' ', '-'])
        .filter_map(|part| part.chars().next())
        .collect();

    if initials.chars().count() > 3 && initials.chars().any(|c| c.is_ascii_uppercase()) {
        initials.retain(|c| !c.is_ascii_lowercase());
    }

    initials.chars().take(2).collect::<String>().to_uppercase()
}

/// Derive a stable `#rrggbb` color from a name.
pub fn name_to_color(full_name: &str) -> String {
    let mut hash: i32 = 0;
    for unit in full_name.encode_utf16() {
        hash = (unit as i32).wrapping_add((hash << 5).wrapping_sub(hash));
    }

    let mut color = String::with_capacity(7);
    color.push('#');
    for i in 0..3 {
        let value = (hash >> (i * 8)) & 0xff;
        color.push_str(&format!("{value:02x}"));
    }
    color
}
