//! Loading scene files from disk.

use std::path::Path;

use log::info;

use crate::parser::{parse_scene, LoadedScene, ParseResult};

/// Read and parse the scene file at `path`.
pub fn load_scene<P: AsRef<Path>>(path: P) -> ParseResult<LoadedScene> {
    let path = path.as_ref();
    info!("Loading scene {}", path.display());

    let content = std::fs::read_to_string(path)?;
    parse_scene(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;

    #[test]
    fn test_load_scene_from_file() {
        let path = std::env::temp_dir().join(format!("specula_load_{}.scn", std::process::id()));
        std::fs::write(
            &path,
            "c 0 0 0 0 0 -1 1 1 1 32 32\nm 1 0 0 0 0 0 1 0 0 0\ns 0 0 -4 1\nl a 1 1 1\n",
        )
        .unwrap();

        let loaded = load_scene(&path).unwrap();
        assert_eq!(loaded.image_size, (32, 32));
        assert_eq!(loaded.scene.surface_count(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("specula_does_not_exist.scn");
        assert!(matches!(load_scene(&path), Err(ParseError::Io(_))));
    }
}
