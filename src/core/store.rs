//! CP-007: Workbook files — atomic save, JSON export, sample content.

use super::parser::Format;
use super::types::*;
use std::path::Path;

/// Default workbook file name.
pub const WORKBOOK_FILE: &str = "craftplan.yaml";

/// Serialize a workbook in the given format.
pub fn render_workbook(workbook: &Workbook, format: Format) -> Result<String, String> {
    match format {
        Format::Yaml => {
            serde_yaml_ng::to_string(workbook).map_err(|e| format!("serialize error: {}", e))
        }
        Format::Json => serde_json::to_string_pretty(workbook)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("serialize error: {}", e)),
    }
}

/// Save a workbook atomically (write to temp, then rename). The format
/// follows the file extension.
pub fn save_workbook(path: &Path, workbook: &Workbook) -> Result<(), String> {
    let content = render_workbook(workbook, Format::from_path(path))?;
    write_atomic(path, &content)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create dir {}: {}", parent.display(), e))?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, content)
        .map_err(|e| format!("cannot write {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        format!(
            "cannot rename {} → {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;

    Ok(())
}

fn pack(id: &str, name: &str) -> Pack {
    Pack {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn sample_item(
    pack_id: &str,
    id: &str,
    name: &str,
    output_qty: f64,
    time: f64,
    inputs: &[(&str, f64)],
) -> Item {
    Item {
        id: id.to_string(),
        pack_id: pack_id.to_string(),
        name: name.to_string(),
        output_qty,
        time,
        inputs: inputs
            .iter()
            .map(|(item_id, qty)| ItemInput {
                item_id: item_id.to_string(),
                qty: *qty,
            })
            .collect(),
    }
}

/// Starter workbook with an "EVE Online" and a "Minecraft" pack.
pub fn sample_workbook() -> Workbook {
    Workbook {
        version: "1.0".to_string(),
        name: Some("my-factory".to_string()),
        packs: vec![pack("eve", "EVE Online"), pack("minecraft", "Minecraft")],
        items: vec![
            sample_item("eve", "tritanium", "Tritanium", 1.0, 0.0, &[]),
            sample_item("eve", "pyerite", "Pyerite", 1.0, 0.0, &[]),
            sample_item(
                "eve",
                "capacitor-battery-1",
                "Capacitor Battery I",
                1.0,
                60.0,
                &[("tritanium", 120.0), ("pyerite", 40.0)],
            ),
            sample_item("minecraft", "log", "Oak Log", 1.0, 0.0, &[]),
            sample_item("minecraft", "cobblestone", "Cobblestone", 1.0, 0.0, &[]),
            sample_item("minecraft", "plank", "Wood Plank", 4.0, 0.0, &[("log", 1.0)]),
            sample_item("minecraft", "stick", "Stick", 4.0, 0.0, &[("plank", 2.0)]),
            sample_item(
                "minecraft",
                "stone-pickaxe",
                "Stone Pickaxe",
                1.0,
                0.0,
                &[("cobblestone", 3.0), ("stick", 2.0)],
            ),
        ],
        jobs: vec![
            Job {
                id: "capacitors".to_string(),
                pack_id: "eve".to_string(),
                name: "Capacitor Run".to_string(),
                lines: vec![JobLine::new("capacitor-battery-1", 10.0)],
            },
            Job {
                id: "mining-kit".to_string(),
                pack_id: "minecraft".to_string(),
                name: "Mining Kit".to_string(),
                lines: vec![
                    JobLine::new("stone-pickaxe", 2.0),
                    JobLine::new("stick", 8.0),
                ],
            },
        ],
    }
}
