use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;

const MAX_BASE_LEN: usize = 60;
const SUFFIX_LEN: usize = 6;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercases `title` and collapses every run of non `[a-z0-9]` characters
/// into a single dash.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.len() <= MAX_BASE_LEN {
        return slug.to_string();
    }
    // ASCII only at this point, so byte slicing is safe
    slug[..MAX_BASE_LEN].trim_end_matches('-').to_string()
}

pub fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// Builds the slug stored for a new post. The random suffix makes collisions
/// between equal titles practically impossible, so there is no retry loop.
pub fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let suffix = random_suffix();
    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}
