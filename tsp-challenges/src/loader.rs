use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Number of preamble lines in the coordinate files this crate reads.
pub const DEFAULT_HEADER_LINES: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// Parses `label,x,y` records, skipping the first `header_lines` lines.
/// Blank lines are ignored and fields past the third are not read.
pub fn parse_nodes(content: &str, header_lines: usize) -> Result<Vec<NodeInfo>> {
    content
        .lines()
        .enumerate()
        .skip(header_lines)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line).map_err(|e| anyhow!("Line {}: {}", index + 1, e)))
        .collect()
}

pub fn read_nodes(path: &Path, header_lines: usize) -> Result<Vec<NodeInfo>> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))?;
    parse_nodes(&content, header_lines)
}

fn parse_line(line: &str) -> Result<NodeInfo> {
    let mut fields = line.split(',').map(str::trim);
    let name = match fields.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(anyhow!("missing vertex label")),
    };
    let mut coordinate = |axis: &str| -> Result<f64> {
        let field = fields
            .next()
            .ok_or_else(|| anyhow!("missing {} coordinate for '{}'", axis, name))?;
        field
            .parse::<f64>()
            .map_err(|_| anyhow!("invalid {} coordinate '{}' for '{}'", axis, field, name))
    };
    let x = coordinate("x")?;
    let y = coordinate("y")?;
    Ok(NodeInfo { name, x, y })
}
