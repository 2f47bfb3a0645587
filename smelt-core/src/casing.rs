//! Case conversion for generated identifiers.

/// Convert a name to PascalCase.
///
/// Word boundaries are `_`, `-`, whitespace, and lower-to-upper transitions.
/// Digits are kept and start a new word boundary check on the following
/// character, so `int32_value` becomes `Int32Value`.
pub fn to_pascal_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = true;
    let mut prev: Option<char> = None;

    for ch in input.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            upper_next = true;
            prev = Some(ch);
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else if ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase()) {
            // lower-to-upper transition keeps the original capital
            out.push(ch);
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    out
}

/// Convert a name to camelCase.
pub fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_from_snake() {
        assert_eq!(to_pascal_case("get_message"), "GetMessage");
        assert_eq!(to_pascal_case("int32_value"), "Int32Value");
    }

    #[test]
    fn pascal_case_keeps_existing_capitals() {
        assert_eq!(to_pascal_case("GetMessage"), "GetMessage");
        assert_eq!(to_pascal_case("IMessager"), "IMessager");
    }

    #[test]
    fn pascal_case_from_kebab_and_spaces() {
        assert_eq!(to_pascal_case("hello-world"), "HelloWorld");
        assert_eq!(to_pascal_case("hello world"), "HelloWorld");
    }

    #[test]
    fn camel_case_lowers_first() {
        assert_eq!(to_camel_case("GetMessage"), "getMessage");
        assert_eq!(to_camel_case("value"), "value");
        assert_eq!(to_camel_case(""), "");
    }
}
