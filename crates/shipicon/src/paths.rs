//! Well-known locations of the game data and the Android project.

use std::path::{Path, PathBuf};

const PIG: &str = "/build/descent/data/descent.pig";
const PIG_FALLBACK: &str = "~/descent/descent/data/descent.pig";

const ANDROID_PROJECT: &str = "/build/dxx-android";
const RES: &str = "/build/dxx-android/app/src/main/res";
const RES_FALLBACK: &str = "~/descent/dxx-android/app/src/main/res";

/// Replaces a leading `~` with the home directory of the current user.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// The `.pig` file to read: the given one, or the first well-known location that exists.
pub fn pig(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        if Path::new(PIG).exists() {
            PathBuf::from(PIG)
        } else {
            expand_home(PIG_FALLBACK)
        }
    })
}

/// The Android resource directory to write icons into.
pub fn res(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        if Path::new(ANDROID_PROJECT).exists() {
            PathBuf::from(RES)
        } else {
            expand_home(RES_FALLBACK)
        }
    })
}

#[cfg(test)]
mod test {
    use super::{expand_home, pig};
    use std::path::{Path, PathBuf};

    #[test]
    fn only_leading_tilde_expands() {
        assert_eq!(expand_home("/data/descent.pig"), Path::new("/data/descent.pig"));
        assert_eq!(expand_home("data/~/x"), Path::new("data/~/x"));
        assert_eq!(expand_home("~user/x"), Path::new("~user/x"));

        let expanded = expand_home("~/descent/descent.pig");
        assert!(expanded.ends_with("descent/descent.pig"));
        if let Some(dirs) = directories::BaseDirs::new() {
            assert!(expanded.starts_with(dirs.home_dir()));
        }
    }

    #[test]
    fn explicit_path_wins() {
        let path = PathBuf::from("some.pig");
        assert_eq!(pig(Some(path.clone())), path);
    }
}
