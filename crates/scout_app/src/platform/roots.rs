use std::path::PathBuf;

/// Roots to scan when none were given: every drive letter that exists on
/// Windows, `/` elsewhere.
pub(crate) fn default_roots() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        ('A'..='Z')
            .map(|letter| PathBuf::from(format!("{letter}:\\")))
            .filter(|root| root.exists())
            .collect()
    }
    #[cfg(not(windows))]
    {
        vec![PathBuf::from("/")]
    }
}

pub(crate) fn resolve_roots(given: Vec<PathBuf>) -> Vec<PathBuf> {
    if given.is_empty() {
        default_roots()
    } else {
        given
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_roots_are_kept_in_order() {
        let given = vec![PathBuf::from("b"), PathBuf::from("a")];
        assert_eq!(resolve_roots(given.clone()), given);
    }

    #[test]
    fn empty_input_enumerates_volumes() {
        let roots = resolve_roots(Vec::new());
        assert!(!roots.is_empty());
        assert!(roots.iter().all(|root| root.is_absolute()));
    }
}
