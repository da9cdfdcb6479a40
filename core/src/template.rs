//! `{{placeholder}}` substitution in endpoint URL templates.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("placeholder pattern is valid")
});

/// Placeholder names in the order they appear in `template`.
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace every placeholder with the value returned by `lookup`.
///
/// Returns `Err(name)` for the first placeholder that `lookup` cannot
/// resolve. Text outside placeholders is copied unchanged.
pub fn render<F>(template: &str, mut lookup: F) -> Result<String, String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str()).ok_or_else(|| name.as_str().to_string())?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// True if `text` still contains an unsubstituted placeholder.
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_placeholders_in_order() {
        let names: Vec<&str> = placeholders("/map/{{species}}/{{asm_one}}/{{region}}/{{asm_two}}").collect();
        assert_eq!(names, vec!["species", "asm_one", "region", "asm_two"]);
        assert_eq!(placeholders("/info/ping").count(), 0);
    }

    #[test]
    fn names_may_contain_digits_after_the_first_character() {
        let names: Vec<&str> = placeholders("/ld/{{species}}/pairwise/{{id1}}/{{id2}}").collect();
        assert_eq!(names, vec!["species", "id1", "id2"]);
        assert_eq!(placeholders("/x/{{1id}}").count(), 0);
    }

    #[test]
    fn renders_every_occurrence() {
        let out = render("/a/{{x}}/b/{{x}}/{{y}}", |name| match name {
            "x" => Some("1".to_string()),
            "y" => Some("two".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(out, "/a/1/b/1/two");
        assert!(!has_placeholders(&out));
    }

    #[test]
    fn reports_first_missing_name() {
        let err = render("/lookup/symbol/{{species}}/{{symbol}}", |name| {
            (name == "species").then(|| "human".to_string())
        })
        .unwrap_err();
        assert_eq!(err, "symbol");
    }

    #[test]
    fn single_braces_are_left_alone() {
        let out = render("/odd/{id}/{{id}}", |_| Some("X".to_string())).unwrap();
        assert_eq!(out, "/odd/{id}/X");
    }
}
