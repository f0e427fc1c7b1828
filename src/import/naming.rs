//! Collision-free names for generated resources.

use std::collections::HashSet;

/// Return `base_name` if it is not reserved, otherwise the first free
/// `base_name_<k>` for k = 1, 2, 3, ...
///
/// The caller is responsible for reserving the returned name.
pub fn allocate(base_name: &str, reserved: &HashSet<String>) -> String {
    if !reserved.contains(base_name) {
        return base_name.to_string();
    }

    let mut suffix: usize = 1;
    loop {
        let candidate = format!("{}_{}", base_name, suffix);
        if !reserved.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Replace everything outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
