use clap::Parser;

use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Compile Jack classes to VM code")]
pub struct CLI {
    /// A .jack file, or a directory whose .jack files are all compiled
    pub path: PathBuf,
}
