//! # dupe-finder CLI
//!
//! Command-line interface for the duplicate file finder.
//!
//! ## Usage
//! ```bash
//! dupe-finder ~/Documents
//! dupe-finder ~/Documents --output text --verify
//! ```

mod cli;

use dupe_finder::Result;

fn main() -> Result<()> {
    cli::run()
}
