//! Pure name-derivation helpers for repository defaults.
//!
//! A repository's table and connection names default from a type path such
//! as `app::billing::UserProfile`: the final segment names the table, the
//! parent segment names the connection, both snake-cased. The helpers are
//! plain functions so the rules stay testable without any repository in
//! play; [`RepositoryDefaults::for_type`] applies them to
//! `std::any::type_name`.
//!
//! [`RepositoryDefaults::for_type`]: crate::repository::RepositoryDefaults::for_type

/// Insert an underscore between a lowercase letter and the uppercase letter
/// that follows it, then lowercase everything: `UserProfile` →
/// `user_profile`, `HTTPServer` → `httpserver`.
pub fn snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;

    for ch in input.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch.to_ascii_lowercase());
    }

    out
}

fn path_segments(type_path: &str) -> Vec<&str> {
    // strip generic arguments before splitting the path
    let base = type_path.split('<').next().unwrap_or(type_path);
    base.split("::").filter(|segment| !segment.is_empty()).collect()
}

/// Default table name: the snake-cased final path segment
pub fn default_table_name(type_path: &str) -> String {
    match path_segments(type_path).last() {
        Some(segment) => snake_case(segment),
        None => String::new(),
    }
}

/// Default connection name: the snake-cased parent path segment, or
/// `default` when the path has no parent.
pub fn default_connection_name(type_path: &str) -> String {
    let segments = path_segments(type_path);
    if segments.len() >= 2 {
        snake_case(segments[segments.len() - 2])
    } else {
        "default".to_string()
    }
}
