//! Text Command Parsing
//!
//! Parses whitespace-separated command lines and executes them against any
//! `CacheClient`.

use bytes::Bytes;
use std::time::Duration;

use super::response::Response;
use crate::client::{CacheClient, Value};
use crate::error::{CacheError, Result};

/// Parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Health check
    Ping,

    /// Set key-value with optional TTL
    Set {
        key: Bytes,
        value: Bytes,
        ttl: Option<Duration>,
    },

    Get { key: Bytes },

    Del { keys: Vec<Bytes> },

    Exists { keys: Vec<Bytes> },

    Expire { key: Bytes, ttl: Duration },

    Incr { key: Bytes },

    HSet { key: Bytes, field_values: Vec<Bytes> },

    HGet { key: Bytes, field: Bytes },

    HGetAll { key: Bytes },

    HDel { key: Bytes, fields: Vec<Bytes> },

    LPush { key: Bytes, values: Vec<Bytes> },

    RPush { key: Bytes, values: Vec<Bytes> },

    LPop { key: Bytes },

    RPop { key: Bytes },
}

impl Command {
    /// Parse a command line. TTL arguments are in milliseconds.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some((name, args)) = parts.split_first() else {
            return Err(usage("empty command"));
        };
        let cmd = name.to_uppercase();

        let command = match cmd.as_str() {
            "PING" => Command::Ping,

            "SET" => {
                expect_args(args, 2, "SET <key> <value> [ttl_ms]")?;
                let ttl = match args.get(2) {
                    Some(ms) => Some(parse_millis(ms)?).filter(|d| !d.is_zero()),
                    None => None,
                };
                if args.len() > 3 {
                    return Err(usage("SET <key> <value> [ttl_ms]"));
                }
                Command::Set {
                    key: arg(args[0]),
                    value: arg(args[1]),
                    ttl,
                }
            }

            "GET" => Command::Get {
                key: single_key(args, "GET <key>")?,
            },

            "DEL" => {
                expect_args(args, 1, "DEL <key> [key ...]")?;
                Command::Del {
                    keys: args.iter().copied().map(arg).collect(),
                }
            }

            "EXISTS" => {
                expect_args(args, 1, "EXISTS <key> [key ...]")?;
                Command::Exists {
                    keys: args.iter().copied().map(arg).collect(),
                }
            }

            "EXPIRE" => {
                if args.len() != 2 {
                    return Err(usage("EXPIRE <key> <ttl_ms>"));
                }
                Command::Expire {
                    key: arg(args[0]),
                    ttl: parse_millis(args[1])?,
                }
            }

            "INCR" => Command::Incr {
                key: single_key(args, "INCR <key>")?,
            },

            "HSET" => {
                expect_args(args, 3, "HSET <key> <field> <value> [field value ...]")?;
                Command::HSet {
                    key: arg(args[0]),
                    field_values: args[1..].iter().copied().map(arg).collect(),
                }
            }

            "HGET" => {
                if args.len() != 2 {
                    return Err(usage("HGET <key> <field>"));
                }
                Command::HGet {
                    key: arg(args[0]),
                    field: arg(args[1]),
                }
            }

            "HGETALL" => Command::HGetAll {
                key: single_key(args, "HGETALL <key>")?,
            },

            "HDEL" => {
                expect_args(args, 2, "HDEL <key> <field> [field ...]")?;
                Command::HDel {
                    key: arg(args[0]),
                    fields: args[1..].iter().copied().map(arg).collect(),
                }
            }

            "LPUSH" | "RPUSH" => {
                expect_args(args, 2, "LPUSH|RPUSH <key> <value> [value ...]")?;
                let key = arg(args[0]);
                let values = args[1..].iter().copied().map(arg).collect();
                if cmd == "LPUSH" {
                    Command::LPush { key, values }
                } else {
                    Command::RPush { key, values }
                }
            }

            "LPOP" => Command::LPop {
                key: single_key(args, "LPOP <key>")?,
            },

            "RPOP" => Command::RPop {
                key: single_key(args, "RPOP <key>")?,
            },

            _ => {
                return Err(CacheError::InvalidArgument(format!(
                    "unknown command: {}",
                    cmd
                )))
            }
        };

        Ok(command)
    }

    /// Command name as used in metrics and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Expire { .. } => "EXPIRE",
            Command::Incr { .. } => "INCR",
            Command::HSet { .. } => "HSET",
            Command::HGet { .. } => "HGET",
            Command::HGetAll { .. } => "HGETALL",
            Command::HDel { .. } => "HDEL",
            Command::LPush { .. } => "LPUSH",
            Command::RPush { .. } => "RPUSH",
            Command::LPop { .. } => "LPOP",
            Command::RPop { .. } => "RPOP",
        }
    }

    /// Execute against a cache client
    pub fn execute(&self, client: &dyn CacheClient) -> Response {
        let result = match self {
            Command::Ping => Ok(Response::Pong),
            Command::Set { key, value, ttl } => client
                .set(
                    key.clone(),
                    Value::Bytes(value.clone()),
                    ttl.unwrap_or(Duration::ZERO),
                )
                .map(|_| Response::Ok),
            Command::Get { key } => client.get(key).map(Response::Value),
            Command::Del { keys } => client.delete(keys).map(|_| Response::Ok),
            Command::Exists { keys } => client.exists(keys).map(Response::from),
            Command::Expire { key, ttl } => client.expire(key, *ttl).map(Response::from),
            Command::Incr { key } => client.incr(key).map(Response::Integer),
            Command::HSet { key, field_values } => {
                client.hset(key, field_values).map(|_| Response::Ok)
            }
            Command::HGet { key, field } => client.hget(key, field).map(Response::Value),
            Command::HGetAll { key } => client.hgetall(key).map(|hash| {
                let mut pairs: Vec<_> = hash.into_iter().collect();
                pairs.sort();
                Response::Map(pairs)
            }),
            Command::HDel { key, fields } => client.hdel(key, fields).map(|_| Response::Ok),
            Command::LPush { key, values } => client.lpush(key, values).map(|_| Response::Ok),
            Command::RPush { key, values } => client.rpush(key, values).map(|_| Response::Ok),
            Command::LPop { key } => client.lpop(key).map(Response::Value),
            Command::RPop { key } => client.rpop(key).map(Response::Value),
        };

        match result {
            Ok(response) => response,
            Err(e) if e.is_miss() => Response::Nil,
            Err(e) => Response::Error(e.to_string()),
        }
    }
}

fn arg(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}

fn usage(expected: &str) -> CacheError {
    CacheError::InvalidArgument(format!("usage: {}", expected))
}

fn expect_args(args: &[&str], min: usize, expected: &str) -> Result<()> {
    if args.len() < min {
        return Err(usage(expected));
    }
    Ok(())
}

fn single_key(args: &[&str], expected: &str) -> Result<Bytes> {
    match args {
        [key] => Ok(arg(key)),
        _ => Err(usage(expected)),
    }
}

fn parse_millis(s: &str) -> Result<Duration> {
    s.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| CacheError::InvalidArgument(format!("invalid ttl in milliseconds: {}", s)))
}
