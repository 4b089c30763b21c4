//! Message template rendering.
//!
//! Templates use `{field}` for the field name and `{0}`, `{1}`, … for the
//! rendered rule parameters. Placeholders that name a missing parameter, and
//! any other brace text, are left untouched.

use std::fmt::Write as _;

use crate::param::Param;

/// Renders `template` for `field` with the registration's `params`.
#[must_use]
pub fn format_message(template: &str, field: &str, params: &[Param]) -> String {
    let mut out = String::with_capacity(template.len() + field.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after[..close];
        if key == "field" {
            out.push_str(field);
        } else if let Some(param) = key.parse::<usize>().ok().and_then(|i| params.get(i)) {
            let _ = write!(out, "{param}");
        } else {
            out.push('{');
            out.push_str(key);
            out.push('}');
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{field} is required", "email is required")]
    #[case(
        "{field} must be between {0} and {1} characters long",
        "email must be between 3 and 10 characters long"
    )]
    #[case("no placeholders", "no placeholders")]
    #[case("{field}{field}", "emailemail")]
    #[case("{2} stays", "{2} stays")]
    #[case("{name} stays", "{name} stays")]
    #[case("unclosed {field", "unclosed {field")]
    #[case("héllo {field} ✓", "héllo email ✓")]
    fn test_format_message(#[case] template: &str, #[case] expected: &str) {
        let params = [Param::from(3), Param::from(10)];
        assert_eq!(format_message(template, "email", &params), expected);
    }

    #[test]
    fn test_list_params_render_joined() {
        let params = [Param::from(vec!["a", "b"])];
        assert_eq!(
            format_message("{field} must be one of {0}", "kind", &params),
            "kind must be one of a, b"
        );
    }
}
