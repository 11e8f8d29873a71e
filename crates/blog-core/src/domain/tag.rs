use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a shared label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
        }
    }
}

/// Convert a title or label into a URL-safe slug.
///
/// Keeps ASCII letters, digits and underscores, lowercases everything, and
/// collapses runs of whitespace and hyphens into a single hyphen. Anything
/// else is dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Hello   World -- again "), "hello-world-again");
    }

    #[test]
    fn slugify_drops_punctuation_and_non_ascii() {
        assert_eq!(slugify("Rust & Django: día 1!"), "rust-django-da-1");
    }

    #[test]
    fn slugify_trims_underscores() {
        assert_eq!(slugify("_private_"), "private");
    }

    #[test]
    fn tag_slug_follows_name() {
        let tag = Tag::new("Web Development");
        assert_eq!(tag.slug, "web-development");
    }
}
