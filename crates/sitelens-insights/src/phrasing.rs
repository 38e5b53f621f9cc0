//! Small English helpers shared by the comparators.

use sitelens_core::domain_label;

/// Labels for a set of URLs, falling back to the full URL for any label
/// that would otherwise be ambiguous within the set.
pub(crate) fn site_labels<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let urls: Vec<&str> = urls.into_iter().collect();
    let labels: Vec<String> = urls.iter().map(|u| domain_label(u)).collect();

    labels
        .iter()
        .zip(&urls)
        .map(|(label, url)| {
            let duplicated = labels.iter().filter(|l| *l == label).count() > 1;
            if duplicated {
                url.trim().to_string()
            } else {
                label.clone()
            }
        })
        .collect()
}

/// `"a"`, `"a and b"`, `"a, b and c"`.
pub(crate) fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Picks the singular or plural verb form for a subject list of `count`.
pub(crate) fn agree<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}
