//! memkv CLI
//!
//! Interactive shell over a process-local in-memory cache.

use clap::Parser;
use memkv::{CacheConfig, Command, InMemoryCache};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// memkv CLI - Interactive In-Memory Cache
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Expiration reaper interval in seconds
    #[arg(long, default_value_t = 60)]
    reaper_interval_secs: u64,

    /// Shards per namespace (0 = auto-detect based on CPU cores)
    #[arg(long, default_value_t = 0)]
    shard_amount: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("memkv=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = CacheConfig::default()
        .with_reaper_interval(Duration::from_secs(args.reaper_interval_secs))
        .with_shard_amount(args.shard_amount);
    let shards = config.effective_shard_amount();
    let cache = InMemoryCache::with_config(config)?;

    info!(
        "memkv ready, reaper every {}s, {} shards per namespace",
        args.reaper_interval_secs, shards
    );
    println!("Type 'help' for available commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("memkv> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        if input.eq_ignore_ascii_case("stats") {
            let stats = cache.stats();
            println!("{}", cache.metrics().summary());
            println!(
                "Keys: scalars={} hashes={} lists={}",
                stats.scalars, stats.hashes, stats.lists
            );
            continue;
        }

        match Command::parse(input) {
            Ok(cmd) => println!("{}", cmd.execute(&cache)),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    cache.shutdown().await;
    Ok(())
}

fn print_help() {
    println!(
        r#"
Available commands:

  PING                          - Check the shell is alive
  SET <key> <value> [ttl_ms]    - Set a string, optionally expiring after ttl_ms
  GET <key>                     - Get a string
  DEL <key> [key ...]           - Delete keys
  EXISTS <key> [key ...]        - 1 if every key exists, else 0
  EXPIRE <key> <ttl_ms>         - Set a time-to-live on an existing key
  INCR <key>                    - Increment a counter
  HSET <key> <field> <value> .. - Set hash fields
  HGET <key> <field>            - Get a hash field
  HGETALL <key>                 - Get every field of a hash
  HDEL <key> <field> [field ..] - Delete hash fields
  LPUSH / RPUSH <key> <v> [v ..]- Push onto the head / tail of a list
  LPOP / RPOP <key>             - Pop from the head / tail of a list

  stats                         - Show metrics and key counts
  help                          - Show this help
  quit / exit                   - Exit the shell

Examples:
  SET session abc 30000   (expires in 30 seconds)
  INCR visits
  HSET user:1 name ada lang rust
  RPUSH jobs a b c
"#
    );
}
