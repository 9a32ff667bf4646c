//! Trial naming from frame file names

/// Derive a trial name from the frame file names of a trial.
///
/// Each name loses everything from its last underscore on (frame number and
/// extension). The result is the longest substring shared by all of those
/// stems, searched in the shortest stem; among equally long candidates the
/// leftmost one wins. Returns an empty string for an empty list or when the
/// stems share no character.
pub fn derive_trial_name<S: AsRef<str>>(file_names: &[S]) -> String {
    let stems: Vec<&str> = file_names.iter().map(|name| frame_stem(name.as_ref())).collect();

    let Some(shortest) = stems.iter().copied().min_by_key(|s| s.chars().count()) else {
        return String::new();
    };

    // Char boundaries so that candidates never split a multi-byte character
    let bounds: Vec<usize> = shortest
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(shortest.len()))
        .collect();
    let char_count = bounds.len() - 1;

    for length in (1..=char_count).rev() {
        for start in 0..=(char_count - length) {
            let candidate = &shortest[bounds[start]..bounds[start + length]];
            if stems.iter().all(|stem| stem.contains(candidate)) {
                return candidate.to_string();
            }
        }
    }

    String::new()
}

/// The part of a file name before its last underscore
fn frame_stem(name: &str) -> &str {
    match name.rfind('_') {
        Some(i) => &name[..i],
        None => name,
    }
}
