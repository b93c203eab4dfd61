use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the projects API payloads
    let types = vec![
        clean_type(Category::export_to_string()?),
        clean_type(Service::export_to_string()?),
        clean_type(NewService::export_to_string()?),
        clean_type(Project::export_to_string()?),
    ];

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    fs::write(&output_path, types.join("\n"))?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips the generator banner and per-type imports; all types land in one
/// file so the imports would only point at files that are never written.
fn clean_type(type_def: String) -> String {
    let body = type_def
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n", body.trim())
}
