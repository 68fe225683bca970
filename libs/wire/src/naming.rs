//! Field naming rule shared by the serializer and the schema introspector.

/// Converts a declared field or variant name to its lower snake case wire name.
///
/// Word boundaries are a lowercase letter or digit followed by an uppercase
/// letter, the last capital of an acronym followed by a lowercase letter
/// (`HTTPServer` becomes `http_server`), and any `-`, `_` or space. Raw
/// identifier prefixes (`r#type`) are dropped.
pub fn wire_name(declared: &str) -> String {
    let name = declared.strip_prefix("r#").unwrap_or(declared);
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            push_separator(&mut out);
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                push_separator(&mut out);
            }
        }

        out.extend(c.to_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("id", "id")]
    #[case("owning_case", "owning_case")]
    #[case("owningCase", "owning_case")]
    #[case("OwningCase", "owning_case")]
    #[case("ItemTypeId", "item_type_id")]
    #[case("HTTPServer", "http_server")]
    #[case("userID", "user_id")]
    #[case("item2Name", "item2_name")]
    #[case("r#type", "type")]
    #[case("kebab-case-name", "kebab_case_name")]
    #[case("double__under", "double_under")]
    #[case("_leading", "leading")]
    #[case("Legendary", "legendary")]
    #[case("", "")]
    fn test_wire_name(#[case] declared: &str, #[case] expected: &str) {
        assert_eq!(wire_name(declared), expected);
    }

    #[test]
    fn test_wire_name_is_idempotent() {
        for name in ["OwningCase", "HTTPServer", "item2Name", "r#type"] {
            let once = wire_name(name);
            assert_eq!(wire_name(&once), once);
        }
    }
}
