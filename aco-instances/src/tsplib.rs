//! Minimal TSPLIB reader: only `NODE_COORD_SECTION` with 2D Euclidean
//! coordinates is supported, which covers the instances this solver targets.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};

use crate::Instance;

pub fn read_instance<P: AsRef<Path>>(path: P) -> Result<Instance> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read instance file: {}", path.display()))?;
    parse_instance(&contents)
        .with_context(|| format!("Failed to parse instance file: {}", path.display()))
}

pub fn parse_instance(contents: &str) -> Result<Instance> {
    let mut node_positions = Vec::new();
    let mut in_coord_section = false;

    for line in contents.lines() {
        let line = line.trim();
        if line == "EOF" {
            break;
        }
        if in_coord_section && !line.is_empty() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(anyhow!("Malformed coordinate line: '{}'", line));
            }
            let x = fields[1]
                .parse::<f64>()
                .map_err(|e| anyhow!("Invalid x coordinate '{}': {}", fields[1], e))?;
            let y = fields[2]
                .parse::<f64>()
                .map_err(|e| anyhow!("Invalid y coordinate '{}': {}", fields[2], e))?;
            node_positions.push((x, y));
        }
        if line == "NODE_COORD_SECTION" {
            in_coord_section = true;
        }
    }

    if node_positions.is_empty() {
        return Err(anyhow!("No coordinates found (missing NODE_COORD_SECTION?)"));
    }
    Ok(Instance::from_node_positions(node_positions))
}
