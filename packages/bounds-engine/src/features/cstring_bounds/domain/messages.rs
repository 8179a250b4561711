//! Report texts

use crate::features::symbolic::{Region, RegionKind};

pub const BOUND_EXCEEDS_FREE_SPACE: &str =
    "Size argument is greater than the free space in the destination buffer";
pub const BOUND_EXCEEDS_DESTINATION: &str =
    "Size argument is greater than the length of the destination buffer";

/// English ordinal suffix for a 1-based position
pub fn ordinal_suffix(n: usize) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// `arg_idx` is 0-based
pub fn null_argument(arg_idx: usize, description: &str) -> String {
    let position = arg_idx + 1;
    format!(
        "Null pointer passed as {}{} argument to {}",
        position,
        ordinal_suffix(position),
        description
    )
}

pub fn label_argument(description: &str, label: &str) -> String {
    format!(
        "Argument to {} is the address of the label '{}', which is not a null-terminated string",
        description, label
    )
}

pub fn unterminated_buffer(description: &str) -> String {
    format!(
        "Argument to {} is not a null-terminated string within its buffer",
        description
    )
}

/// Argument points to storage that can never hold a C string
pub fn non_string_region(description: &str, region: &Region) -> String {
    match summarize_region(region) {
        Some(summary) => format!(
            "Argument to {} is {}, which is not a null-terminated string",
            description, summary
        ),
        None => format!("Argument to {} is not a null-terminated string", description),
    }
}

pub fn overflows_destination(description: &str) -> String {
    format!("{} overflows the destination buffer", capitalize(description))
}

/// Short phrase naming what `region` is
pub fn summarize_region(region: &Region) -> Option<String> {
    match region.kind() {
        RegionKind::FunctionCode { name: Some(name) } => {
            Some(format!("the address of the function '{}'", name))
        }
        RegionKind::FunctionCode { name: None } => Some("the address of a function".to_string()),
        RegionKind::BlockCode => Some("block text".to_string()),
        RegionKind::BlockData => Some("a block".to_string()),
        RegionKind::TempObject { ty } => Some(format!("a C++ temp object of type {}", ty)),
        _ => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
