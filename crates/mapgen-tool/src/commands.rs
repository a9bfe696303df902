//! Subcommand implementations. Each reads a schematic file, optionally
//! transforms it and writes the result.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use mapgen_schematic::{FORMAT_VERSION, Schematic, SchematicError};
use mapgen_voxel::{ContentTableError, NodeDefTable, Rotation};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Schematic(#[from] SchematicError),
    #[error("node manifest: {0}")]
    Nodes(#[from] ContentTableError),
}

/// Parses `from=to`.
pub fn parse_mapping(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected FROM=TO, got '{s}'")),
    }
}

/// Parses "90", "180" or "270".
pub fn parse_rotation(s: &str) -> Result<Rotation, String> {
    Rotation::from_degrees_str(s).ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got '{s}'"))
}

/// A human-readable summary of a schematic file.
pub fn info(path: &Path) -> Result<String, ToolError> {
    let schem = Schematic::load_from_file(path)?;
    let size = schem.size();

    let mut counts = vec![0usize; schem.node_names().len()];
    for node in schem.nodes() {
        counts[node.content.0 as usize] += 1;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} (format v{})", path.display(), FORMAT_VERSION);
    let _ = writeln!(out, "size: {} x {} x {} ({} cells)", size.x, size.y, size.z, schem.volume());
    let _ = writeln!(out, "nodes:");
    for (code, name) in schem.node_names().iter().enumerate() {
        let _ = writeln!(out, "  {code:>3} {name} ({})", counts[code]);
    }
    let slices: Vec<String> = schem.slice_probs().iter().map(u8::to_string).collect();
    let _ = writeln!(out, "slice probabilities: [{}]", slices.join(", "));
    Ok(out)
}

/// Rotates a schematic file. Orientation bytes are remapped for node types
/// listed in `nodes` (a RON node manifest); others keep theirs.
pub fn rotate(input: &Path, output: &Path, rotation: Rotation, nodes: Option<&Path>) -> Result<(), ToolError> {
    let table = match nodes {
        Some(path) => NodeDefTable::from_ron_file(path)?,
        None => NodeDefTable::new(),
    };
    let mut schem = Schematic::load_from_file(input)?;
    let remap = schem.content_remap(&table);
    schem.apply_rotation(rotation, &remap);
    schem.save_to_file(output)?;
    tracing::info!("rotated {} by {} degrees", input.display(), rotation.degrees());
    Ok(())
}

/// Rewrites node names in a schematic file.
pub fn replace(input: &Path, output: &Path, mappings: &[(String, String)]) -> Result<(), ToolError> {
    let map: BTreeMap<String, String> = mappings.iter().cloned().collect();
    let mut schem = Schematic::load_from_file(input)?;
    schem.apply_replacements(&map);
    schem.save_to_file(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_schematic::{SchematicDef, SchematicNodeDef, SliceProbDef};

    fn def() -> SchematicDef {
        let n = |name: &str, param2: u8| SchematicNodeDef {
            name: name.into(),
            prob: 255,
            param2,
        };
        SchematicDef {
            size: (2, 1, 1),
            data: vec![n("default:tree", 0), n("stairs:stair_wood", 1)],
            yslice_prob: vec![SliceProbDef { ypos: 0, prob: 200 }],
        }
    }

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("in.mts");
        Schematic::from_def(&def()).unwrap().save_to_file(&path).unwrap();
        path
    }

    #[test]
    fn test_parse_mapping() {
        assert_eq!(
            parse_mapping("default:tree=default:pine_tree"),
            Ok(("default:tree".into(), "default:pine_tree".into()))
        );
        assert!(parse_mapping("default:tree").is_err());
        assert!(parse_mapping("=x").is_err());
    }

    #[test]
    fn test_parse_rotation() {
        assert_eq!(parse_rotation("180"), Ok(Rotation::R180));
        assert!(parse_rotation("45").is_err());
    }

    #[test]
    fn test_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());
        let text = info(&path).unwrap();
        assert!(text.contains("size: 2 x 1 x 1"));
        assert!(text.contains("stairs:stair_wood (1)"));
        assert!(text.contains("[200]"));
    }

    #[test]
    fn test_rotate_with_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path());
        let manifest = dir.path().join("nodes.ron");
        std::fs::write(
            &manifest,
            r#"[(name: "default:tree"), (name: "stairs:stair_wood", param2: facedir)]"#,
        )
        .unwrap();
        let output = dir.path().join("out.mts");

        rotate(&input, &output, Rotation::R90, Some(&manifest)).unwrap();
        let rotated = Schematic::load_from_file(&output).unwrap();
        assert_eq!((rotated.size().x, rotated.size().z), (1, 2));
        let stair = rotated
            .nodes()
            .iter()
            .find(|n| rotated.node_names()[n.content.0 as usize] == "stairs:stair_wood")
            .unwrap();
        assert_eq!(stair.param2, 2);
    }

    #[test]
    fn test_rotate_without_manifest_keeps_param2() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path());
        let output = dir.path().join("out.mts");
        rotate(&input, &output, Rotation::R180, None).unwrap();
        let rotated = Schematic::load_from_file(&output).unwrap();
        assert!(rotated.nodes().iter().any(|n| n.param2 == 1));
    }

    #[test]
    fn test_replace() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture(dir.path());
        let output = dir.path().join("out.mts");
        replace(
            &input,
            &output,
            &[("default:tree".into(), "default:pine_tree".into())],
        )
        .unwrap();
        let out = Schematic::load_from_file(&output).unwrap();
        assert_eq!(out.node_names()[0], "default:pine_tree");
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            info(&dir.path().join("nope.mts")),
            Err(ToolError::Schematic(SchematicError::Io { .. }))
        ));
    }
}
