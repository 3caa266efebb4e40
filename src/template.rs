// This module implements the fixed rendering contract between the generators and
// the output artifact: plain ${name} substitution of named fragments into a
// header template. A reference to a fragment no generator produced is a fatal
// error; a produced fragment the template never references is logged as a
// warning since it usually means the wrong template was paired with the
// pipeline.

//! Named-fragment template renderer.

use crate::error::{GenError, GenResult};
use crate::gen::Fragments;
use std::collections::BTreeSet;

/// Substitute every `${name}` reference in `template` with the matching
/// fragment text.
pub fn render(template: &str, fragments: &Fragments) -> GenResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut used: BTreeSet<&str> = BTreeSet::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(GenError::UnterminatedFragment {
            offset: offset + start,
        })?;
        let name = &after[..end];
        match fragments.get(name) {
            Some(text) => out.push_str(text),
            None => {
                return Err(GenError::MissingFragment {
                    name: name.to_string(),
                })
            }
        }
        used.insert(name);
        offset += start + 2 + end + 1;
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    for name in fragments.keys() {
        if !used.contains(name.as_str()) {
            log::warn!("fragment {name} not referenced by template");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(entries: &[(&str, &str)]) -> Fragments {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitution() {
        let out = render(
            "before\n${body}\nafter\n",
            &fragments(&[("body", "line one\nline two")]),
        )
        .unwrap();
        assert_eq!(out, "before\nline one\nline two\nafter\n");
    }

    #[test]
    fn test_repeated_reference() {
        let out = render("${x} and ${x}", &fragments(&[("x", "a")])).unwrap();
        assert_eq!(out, "a and a");
    }

    #[test]
    fn test_missing_fragment_is_fatal() {
        assert_eq!(
            render("${gone}", &fragments(&[])).unwrap_err(),
            GenError::MissingFragment {
                name: "gone".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_reference() {
        assert_eq!(
            render("ok ${broken", &fragments(&[])).unwrap_err(),
            GenError::UnterminatedFragment { offset: 3 }
        );
    }
}
