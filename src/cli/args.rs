// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to a TOML config file (optional)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// AWS shared-config profile name (optional)
    #[arg(short, long, value_name = "PROFILE", global = true)]
    pub profile: Option<String>,

    /// AWS region (optional)
    #[arg(short, long, value_name = "REGION", global = true)]
    pub region: Option<String>,

    /// Custom service endpoint, e.g. a local emulator (optional)
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint_url: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Walk through the table tasks: create, load, update, query, scan, PartiQL
    NotesDemo {
        /// JSON file with the notes to load
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Table name
        #[arg(short, long, value_name = "TABLE")]
        table: Option<String>,
    },

    /// Load notes from a JSON file into the table
    Load {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Flag a note as incomplete
    Complete {
        #[arg(value_name = "USER_ID")]
        user_id: String,

        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Show all notes of a user
    Query {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },

    /// Scan the whole table page by page
    Scan {
        /// Items per page
        #[arg(long, value_name = "N")]
        page_size: Option<u32>,
    },

    /// Fetch one note with a PartiQL statement
    Lookup {
        #[arg(value_name = "USER_ID")]
        user_id: String,

        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Delete the notes table
    DropTable,

    /// Walk through the bucket tasks: create, upload, list, presign, delete
    BucketDemo {
        /// Bucket name
        #[arg(short, long, value_name = "BUCKET")]
        bucket: Option<String>,

        /// Local file to upload
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Upload a local file to the bucket
    Upload {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Object key (defaults to the file name)
        #[arg(long, value_name = "KEY")]
        key: Option<String>,

        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,

        /// User metadata, repeatable
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        metadata: Vec<(String, String)>,
    },

    /// List the buckets of the account
    ListBuckets,

    /// List the objects in the bucket
    ListObjects,

    /// Print a time-limited download link for an object
    Presign {
        #[arg(value_name = "KEY")]
        key: String,

        /// Link lifetime in seconds
        #[arg(long, value_name = "SECS")]
        expires_in: Option<u64>,
    },

    /// Delete all objects and then the bucket itself
    Teardown,
}

/// Parse a `KEY=VALUE` pair
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid KEY=VALUE: no `=` or empty key in `{}`", s)),
    }
}
