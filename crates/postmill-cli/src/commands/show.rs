//! Show command - display a stored post.

use super::get_database;
use anyhow::Result;
use colored::Colorize;

pub fn run(id: &str) -> Result<()> {
    let db = get_database()?;
    let post = db.get_post(id)?;

    println!("{}", post.title.white().bold());
    println!("{}", "─".repeat(50));
    println!("  ID: {}", post.id);
    println!("  Author: {}", post.author);
    println!("  Created: {}", post.created_at.format("%Y-%m-%d %H:%M"));
    if !post.category.is_empty() {
        println!("  Category: {}", post.category);
    }

    let tags = post.tag_list();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  Tags: {}", tags.join(" ").cyan());
    }
    if !post.is_published {
        println!("  {}", "Draft".yellow());
    }
    if !post.summary.is_empty() {
        println!();
        println!("{}", post.summary.dimmed());
    }

    println!();
    println!("{}", post.content);

    Ok(())
}
