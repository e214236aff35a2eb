//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)

use selah_core::{Book, ChapterView, Config, SearchHit};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print the book list
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Json => self.print_json(&books),
            OutputFormat::Human => {
                for book in books {
                    println!(
                        "{:>3}. {:<6} {} ({} chapters, {})",
                        book.order,
                        book.abbrev,
                        book.name,
                        book.chapters,
                        book.testament.as_db_str()
                    );
                }
            }
        }
    }

    /// Print a full chapter
    pub fn print_chapter(&self, chapter: &ChapterView) {
        match self.format {
            OutputFormat::Json => self.print_json(&chapter),
            OutputFormat::Human => {
                println!(
                    "{} {} (of {})",
                    chapter.book.name, chapter.number, chapter.total_chapters
                );
                println!();
                for verse in &chapter.verses {
                    println!("{:>3}  {}", verse.verse, verse.text);
                }
            }
        }
    }

    /// Print a single verse
    pub fn print_verse(&self, book: &str, chapter: u32, verse: u32, text: &str) {
        match self.format {
            OutputFormat::Json => self.print_json(&serde_json::json!({
                "book": book,
                "chapter": chapter,
                "verse": verse,
                "text": text,
            })),
            OutputFormat::Human => {
                println!("{} {}:{}  {}", book, chapter, verse, text);
            }
        }
    }

    /// Print search results
    pub fn print_hits(&self, query: &str, hits: &[SearchHit]) {
        match self.format {
            OutputFormat::Json => self.print_json(&hits),
            OutputFormat::Human => {
                if hits.is_empty() {
                    println!("No verses matching {:?}", query);
                    return;
                }
                for hit in hits {
                    println!(
                        "{} {}:{}  {}",
                        hit.book_abbrev, hit.chapter, hit.verse, hit.text
                    );
                }
                println!();
                println!("{} result(s)", hits.len());
            }
        }
    }

    /// Print the current configuration
    pub fn print_config(&self, config: &Config) {
        match self.format {
            OutputFormat::Json => self.print_json(config),
            OutputFormat::Human => {
                println!("data_dir:     {}", config.data_dir.display());
                println!("api_base_url: {}", config.api_base_url);
                println!("config file:  {}", Config::config_file_path().display());
            }
        }
    }
}
