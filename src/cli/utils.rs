use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::models::BookmarkView;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of bookmarks in the appropriate format
pub fn output_bookmarks(output_format: &OutputFormat, bookmarks: &[BookmarkView]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(bookmarks)?);
        }
        OutputFormat::Text => {
            if bookmarks.is_empty() {
                println!("No bookmarks found");
            }
            for bookmark in bookmarks {
                println!("{}", format_bookmark(bookmark));
            }
        }
    }
    Ok(())
}

/// Output a single bookmark in the appropriate format
pub fn output_bookmark(output_format: &OutputFormat, bookmark: &BookmarkView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(bookmark)?);
        }
        OutputFormat::Text => {
            println!("{}", format_bookmark(bookmark));
        }
    }
    Ok(())
}

pub fn format_bookmark(bookmark: &BookmarkView) -> String {
    let mut text = format!(
        "[{}] {} ({}/5)\n    {}",
        bookmark.id, bookmark.title, bookmark.rating, bookmark.url
    );
    if !bookmark.description.is_empty() {
        text.push_str(&format!("\n    {}", bookmark.description));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_format_skips_empty_description() {
        let bookmark = BookmarkView {
            id: 3,
            title: "MDN".to_string(),
            url: "https://developer.mozilla.org".to_string(),
            description: String::new(),
            rating: 5,
        };
        assert_eq!(format_bookmark(&bookmark), "[3] MDN (5/5)\n    https://developer.mozilla.org");
    }
}
