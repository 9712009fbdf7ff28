//! Human-readable names for TIFF codes
//!
//! The tables live in `tiff_tags.toml` at the crate root and are embedded
//! at compile time, then parsed once on first use.

use std::collections::HashMap;
use lazy_static::lazy_static;
use log::warn;

use crate::tiff::errors::{TiffError, TiffResult};

lazy_static! {
    static ref TAG_DEFINITIONS: TagDefinitions = {
        let content = include_str!("../../tiff_tags.toml");
        TagDefinitions::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse TIFF tag definitions: {}", e);
            TagDefinitions::default()
        })
    };
}

/// Code-to-name tables for tags and the enumerated tag values the dump shows
#[derive(Debug, Default)]
pub struct TagDefinitions {
    pub tag_names: HashMap<u16, String>,
    pub field_type_names: HashMap<u16, String>,
    pub compression_names: HashMap<u16, String>,
    pub photometric_names: HashMap<u16, String>,
}

impl TagDefinitions {
    /// Parse definitions from a TOML string
    pub fn from_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| TiffError::GenericError(format!("Failed to parse TOML: {}", e)))?;

        let mut defs = TagDefinitions::default();
        Self::parse_code_table(&toml_value, "tag_ids", &mut defs.tag_names);
        Self::parse_code_table(&toml_value, "field_type_ids", &mut defs.field_type_names);
        Self::parse_code_table(&toml_value, "compression_codes", &mut defs.compression_names);
        Self::parse_code_table(&toml_value, "photometric_codes", &mut defs.photometric_names);

        Ok(defs)
    }

    fn parse_code_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }
}

fn lookup(table: &'static HashMap<u16, String>, code: u64) -> &'static str {
    u16::try_from(code).ok()
        .and_then(|code| table.get(&code))
        .map(String::as_str)
        .unwrap_or("Unknown")
}

/// Name of a TIFF tag, or "Unknown"
pub fn get_tag_name(tag: u16) -> &'static str {
    lookup(&TAG_DEFINITIONS.tag_names, tag as u64)
}

/// Name of a TIFF field type, or "Unknown"
pub fn get_field_type_name(field_type: u16) -> &'static str {
    lookup(&TAG_DEFINITIONS.field_type_names, field_type as u64)
}

/// Name of a compression scheme, or "Unknown"
pub fn get_compression_name(code: u64) -> &'static str {
    lookup(&TAG_DEFINITIONS.compression_names, code)
}

/// Name of a photometric interpretation, or "Unknown"
pub fn get_photometric_name(code: u64) -> &'static str {
    lookup(&TAG_DEFINITIONS.photometric_names, code)
}
