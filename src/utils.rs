/// Utility functions for user interaction and common operations.
use crate::error::Result;
use std::io::{self, Write};

/// Prompt user for confirmation before performing potentially destructive operations.
pub fn confirm_deletion(keys: &[String], force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    println!("About to delete {} object(s):", keys.len());
    for key in keys.iter().take(5) {
        println!("  {key}");
    }
    if keys.len() > 5 {
        println!("  ... and {} more", keys.len() - 5);
    }

    print!("Continue? (y/N): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
