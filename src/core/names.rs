//! Column name to field name mapping.

/// Converts a column label into a lowerCamelCase member name.
///
/// The label is split on `-`, `_` and space; the first fragment is lower
/// cased and every following fragment is capitalized.
///
/// ```
/// use csv_binder::core::names::to_member_name;
///
/// assert_eq!(to_member_name("POSTAL_ADDRESS"), "postalAddress");
/// assert_eq!(to_member_name("first-name"), "firstName");
/// assert_eq!(to_member_name("Birth Date"), "birthDate");
/// ```
pub fn to_member_name(label: &str) -> String {
    let mut name = String::with_capacity(label.len());
    let fragments = label
        .split(['-', '_', ' '])
        .filter(|fragment| !fragment.is_empty());

    for (index, fragment) in fragments.enumerate() {
        let lower = fragment.to_lowercase();
        if index == 0 {
            name.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

fn is_plain_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ',')
}

/// Derives field names from a header row.
///
/// When every token is made of alphanumerics, underscores and commas only, the
/// tokens are taken as they are. Otherwise each token goes through
/// [`to_member_name`].
pub fn infer_field_names(header: &[String]) -> Vec<String> {
    if header.iter().all(|token| is_plain_token(token)) {
        return header.to_vec();
    }
    header.iter().map(|token| to_member_name(token)).collect()
}

/// Tells whether `name` designates the field declared as `ident`.
///
/// Accepted forms: the identifier itself, its member name
/// (`postal_address` -> `postalAddress`) and a case-insensitive spelling of
/// the identifier, which is what the writer emits as header.
pub fn field_matches(ident: &str, name: &str) -> bool {
    ident == name || ident.eq_ignore_ascii_case(name) || to_member_name(ident) == name
}
