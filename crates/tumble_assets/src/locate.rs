use std::path::{Path, PathBuf};

/// File whose presence marks the resource folder.
pub const MARKER_FILE: &str = "resources.loc";

const MAX_PARENT_LEVELS: usize = 16;

/// Look for `resources/resources.loc` in `start` and up to 16 parents.
/// Returns the `resources` directory.
pub fn find_resource_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(MAX_PARENT_LEVELS + 1)
        .map(|dir| dir.join("resources"))
        .find(|candidate| candidate.join(MARKER_FILE).is_file())
}

/// Where each demo texture lives below the resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePaths {
    pub crate_box: PathBuf,
    pub checker: PathBuf,
    /// `pool_01.ppm` … `pool_NN.ppm`.
    pub balls: Vec<PathBuf>,
}

impl TexturePaths {
    pub const BALL_COUNT: usize = 15;

    pub fn new(root: &Path) -> Self {
        let textures = root.join("textures");
        Self {
            crate_box: textures.join("crate.bmp"),
            checker: textures.join("checker.bmp"),
            balls: (1..=Self::BALL_COUNT)
                .map(|i| textures.join("pool").join(format!("pool_{i:02}.ppm")))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_paths_are_zero_padded() {
        let paths = TexturePaths::new(Path::new("res"));
        assert_eq!(paths.balls.len(), 15);
        assert_eq!(paths.balls[0], Path::new("res/textures/pool/pool_01.ppm"));
        assert_eq!(paths.balls[14], Path::new("res/textures/pool/pool_15.ppm"));
        assert_eq!(paths.crate_box, Path::new("res/textures/crate.bmp"));
    }

    #[test]
    fn finds_marker_in_a_parent_directory() {
        let base = std::env::temp_dir().join(format!("tumble_locate_{}", std::process::id()));
        let nested = base.join("a").join("b").join("c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(base.join("resources")).unwrap();
        std::fs::write(base.join("resources").join(MARKER_FILE), b"").unwrap();

        assert_eq!(find_resource_root(&nested), Some(base.join("resources")));
        std::fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn gives_up_when_no_marker_exists() {
        assert_eq!(find_resource_root(Path::new("/tumble-no-such-dir/a/b")), None);
    }
}
