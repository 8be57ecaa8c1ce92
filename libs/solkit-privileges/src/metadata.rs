//! Entity-definition lookup on a solution.

use crate::models::{EntityDef, Solution};
use solkit_utils::is_non_empty_string;

/// Look up an entity definition by `(name, type)`.
///
/// An exact `(name, type)` match wins; otherwise falls back to the untyped
/// `(name, no-type)` definition. Names and types match exactly (the metadata
/// catalog is case-normalized at authoring time).
#[must_use]
pub fn lookup_entity<'a>(
    solution: &'a Solution,
    entity_name: &str,
    entity_type: Option<&str>,
) -> Option<&'a EntityDef> {
    if entity_name.is_empty() {
        return None;
    }

    solution
        .entities
        .iter()
        .find(|e| e.entity_name == entity_name && e.entity_type.as_deref() == entity_type)
        .or_else(|| {
            solution
                .entities
                .iter()
                .find(|e| e.entity_name == entity_name && e.entity_type.is_none())
        })
}

/// Look up an entity definition by its URL slug.
#[must_use]
pub fn lookup_entity_by_slug<'a>(solution: &'a Solution, slug: &str) -> Option<&'a EntityDef> {
    if !is_non_empty_string(Some(slug)) {
        return None;
    }
    solution
        .entities
        .iter()
        .find(|e| e.slug.as_deref() == Some(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution() -> Solution {
        Solution {
            entities: vec![
                EntityDef {
                    entity_name: "contact".to_owned(),
                    entity_type: None,
                    slug: Some("contacts".to_owned()),
                    ..EntityDef::default()
                },
                EntityDef {
                    entity_name: "contact".to_owned(),
                    entity_type: Some("lead".to_owned()),
                    slug: Some("leads".to_owned()),
                    ..EntityDef::default()
                },
            ],
            ..Solution::default()
        }
    }

    #[test]
    fn exact_type_match_wins() {
        let s = solution();
        let entity = lookup_entity(&s, "contact", Some("lead")).expect("typed entity");
        assert_eq!(entity.entity_type.as_deref(), Some("lead"));
    }

    #[test]
    fn unknown_type_falls_back_to_untyped() {
        let s = solution();
        let entity = lookup_entity(&s, "contact", Some("vendor")).expect("untyped fallback");
        assert_eq!(entity.entity_type, None);
    }

    #[test]
    fn unknown_name_or_empty_name_is_none() {
        let s = solution();
        assert!(lookup_entity(&s, "invoice", None).is_none());
        assert!(lookup_entity(&s, "", None).is_none());
    }

    #[test]
    fn slug_lookup() {
        let s = solution();
        let entity = lookup_entity_by_slug(&s, "leads").expect("slug match");
        assert_eq!(entity.entity_type.as_deref(), Some("lead"));
        assert!(lookup_entity_by_slug(&s, "unknown").is_none());
        assert!(lookup_entity_by_slug(&s, "").is_none());
    }
}
