//! Plain-text scene lists.
//!
//! One interval per line, either `start,stop` or `start stop`. Blank lines
//! are ignored. A negative stop is kept as-is; resolving it against the
//! content duration is up to the caller.

use std::fs;
use std::path::Path;

use clipx_models::Scene;
use tracing::debug;

use crate::error::{EventError, EventResult};

/// Parse scene-list text.
pub fn parse_scene_list(text: &str) -> EventResult<Vec<Scene>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(idx + 1, line.trim()))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> EventResult<Scene> {
    let mut fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 2 {
        fields = line.split_whitespace().collect();
    }
    if fields.len() != 2 {
        return Err(EventError::scene_list(
            line_no,
            format!("expected a start/stop pair, got '{}'", line),
        ));
    }

    let parse = |field: &str| {
        field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| EventError::scene_list(line_no, format!("'{}' is not a number", field)))
    };

    Ok(Scene::new(parse(fields[0])?, parse(fields[1])?))
}

/// Load a scene list from disk.
///
/// Returns `Ok(None)` when `path` does not exist or is a directory, meaning
/// no scene file was supplied.
pub fn load_scene_list(path: &Path) -> EventResult<Option<Vec<Scene>>> {
    if !path.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(path)?;
    let scenes = parse_scene_list(&text)?;
    debug!(path = %path.display(), scenes = scenes.len(), "Loaded scene list");
    Ok(Some(scenes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_mixed_separators() {
        let scenes = parse_scene_list("0,100\n100 200\n\n  250.5 , -10 \n").unwrap();
        let bounds: Vec<(f64, f64)> = scenes.iter().map(Scene::bounds).collect();
        assert_eq!(bounds, vec![(0.0, 100.0), (100.0, 200.0), (250.5, -10.0)]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_scene_list("").unwrap().is_empty());
        assert!(parse_scene_list("\n \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_scene_list("0,10\n\n5,6,7\n").unwrap_err();
        assert!(matches!(err, EventError::SceneList { line: 3, .. }));
        assert!(err.is_config_error());

        let err = parse_scene_list("abc,10").unwrap_err();
        assert!(matches!(err, EventError::SceneList { line: 1, .. }));

        assert!(parse_scene_list("12").is_err());
    }

    #[test]
    fn test_load_missing_or_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scene_list(dir.path()).unwrap().is_none());
        assert!(load_scene_list(&dir.path().join("missing.txt")).unwrap().is_none());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "15,45").unwrap();
        writeln!(file, "60 90").unwrap();

        let scenes = load_scene_list(file.path()).unwrap().unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].bounds(), (60.0, 90.0));
    }
}
