//! Hash command implementation.

use register_canonical::ContentHash;
use std::io::{self, Read};

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let content = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    println!("{}", ContentHash::of(strip_newline(&content)));
    Ok(())
}

/// Drops one trailing line ending.
fn strip_newline(content: &str) -> &str {
    content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_newline() {
        assert_eq!(strip_newline("{}\n"), "{}");
        assert_eq!(strip_newline("{}\r\n"), "{}");
        assert_eq!(strip_newline("{}\n\n"), "{}\n");
        assert_eq!(strip_newline("{}"), "{}");
    }
}
