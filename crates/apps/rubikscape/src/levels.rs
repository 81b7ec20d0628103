use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use rubik::{Level, LevelResponse};

/// Read a level from a JSON file.
///
/// Accepts either a service envelope (`{"levels": [...]}` or
/// `{"level": {...}}`) or a bare level object. With several levels, `id`
/// picks one; otherwise the first is used.
pub fn load_level(path: &Path, id: Option<&str>) -> anyhow::Result<Level> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading level {}", path.display()))?;
    select_level(&text, id).with_context(|| format!("loading level {}", path.display()))
}

pub fn select_level(json: &str, id: Option<&str>) -> anyhow::Result<Level> {
    let mut levels = LevelResponse::from_json(json)?.into_levels();
    if levels.is_empty() {
        levels.push(Level::from_json(json)?);
    }

    match id {
        Some(id) => match levels.into_iter().find(|level| level.id == id) {
            Some(level) => Ok(level),
            None => bail!("no level with id {id}"),
        },
        None => Ok(levels.remove(0)),
    }
}
