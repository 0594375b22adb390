use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fs;

pub fn read_json_file<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn Error>> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}: {}", path, e))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse file: {}: {}", path, e))?;
    Ok(value)
}

/// Writes the value as pretty JSON to the file at the given path, or to stdout if there is no
/// path.
pub fn write_json<T: Serialize>(value: &T, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        None => println!("{}", json),
        Some(path) => fs::write(path, json + "\n")
            .map_err(|e| format!("Failed to write file: {}: {}", path, e))?,
    }
    Ok(())
}
