use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pagepool::{BufferPool, FileDisk, StorageManager};

#[derive(Parser)]
#[command(name = "pagepool-cli", about = "Interactive shell for a page cache over a database file")]
struct Args {
    /// Path to the database file (created if absent)
    #[arg(default_value = "./pagepool.db")]
    db_path: PathBuf,

    /// Number of buffer frames in the pool
    #[arg(long, default_value_t = 8)]
    frames: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();

    println!("pagepool CLI v0.1.0");
    println!("Type 'help' for commands, 'quit' to exit");
    println!();

    let disk = FileDisk::open(&args.db_path)?;
    let storage = Arc::new(StorageManager::new(Box::new(disk)));
    let pool = BufferPool::new(storage, args.frames)?;
    pool.enable_stats();

    // Main REPL loop
    loop {
        print!("pagepool> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "quit" | "exit" => {
                pool.flush_all()?;
                println!("Goodbye!");
                break;
            }
            "help" => {
                show_help();
                continue;
            }
            "stats" => {
                show_stats(&pool);
                continue;
            }
            "flushall" => {
                match pool.flush_all() {
                    Ok(()) => println!("All dirty pages flushed."),
                    Err(e) => println!("Error: {e}"),
                }
                continue;
            }
            "" => continue,
            _ => {}
        }

        match execute_command(&pool, input) {
            Ok(result) => println!("{result}"),
            Err(e) => println!("Error: {e}"),
        }
    }

    Ok(())
}

fn show_help() {
    println!("pagepool CLI Commands:");
    println!("  help                       - Show this help message");
    println!("  quit/exit                  - Flush dirty pages and exit");
    println!("  new                        - Allocate a fresh page");
    println!("  read <page> <offset>       - Read the string stored at offset");
    println!("  write <page> <offset> <s>  - Write a string at offset and mark dirty");
    println!("  flush <page>               - Write a page back to disk");
    println!("  flushall                   - Write all dirty pages back to disk");
    println!("  delete <page>              - Discard a page from the pool");
    println!("  pins <page>                - Show a page's pin count");
    println!("  stats                      - Display buffer pool statistics");
}

fn show_stats(pool: &BufferPool) {
    println!("Buffer Pool Information:");
    println!("  Capacity:        {} frames", pool.capacity());
    println!("  Resident pages:  {}", pool.resident_pages());
    println!("  Available:       {}", pool.available());
    if let Some(stats) = pool.stats() {
        let (hits, misses) = stats.get();
        println!("  Hits/Misses:     {hits}/{misses}");
        println!("  Hit rate:        {:.1}%", stats.hit_rate());
    }
}

fn execute_command(pool: &BufferPool, input: &str) -> Result<String, Box<dyn Error>> {
    let parts: Vec<&str> = input.splitn(4, ' ').collect();

    match parts.as_slice() {
        ["new"] => {
            let (page_id, handle) = pool.new_page()?;
            drop(handle);
            Ok(format!("Allocated page {page_id}."))
        }
        ["read", page, offset] => {
            let handle = pool.fetch_page(page.parse()?)?;
            let value = handle.read().get_string(offset.parse()?);
            Ok(format!("\"{value}\""))
        }
        ["write", page, offset, text] => {
            let handle = pool.fetch_page(page.parse()?)?;
            handle.write().set_string(offset.parse()?, text);
            handle.mark_dirty();
            Ok(format!("Wrote {} byte(s).", text.len()))
        }
        ["flush", page] => {
            pool.flush_page(page.parse()?)?;
            Ok("Page flushed.".to_string())
        }
        ["delete", page] => {
            pool.delete_page(page.parse()?)?;
            Ok("Page deleted.".to_string())
        }
        ["pins", page] => {
            let page_id = page.parse()?;
            match pool.pin_count(page_id) {
                Some(pins) => Ok(format!("Page {page_id} has {pins} pin(s).")),
                None => Ok(format!("Page {page_id} is not resident.")),
            }
        }
        _ => Ok(format!("Unknown command: '{input}'. Type 'help' for commands.")),
    }
}
