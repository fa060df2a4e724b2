use jackdaw_compiler::analyse;
use jackdaw_errors::CompileError;

use log::info;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Compiles `path`, a `.jack` file or a directory of them. Per-file
/// failures go to stderr and do not stop the remaining files; returns
/// whether every file compiled cleanly.
pub fn run(path: &Path) -> io::Result<bool> {
    let mut ok = true;

    for source in sources(path)? {
        match compile_file(&source) {
            Ok(output) => info!("compiled {} -> {}", source.display(), output.display()),
            Err(err) => {
                eprintln!("{}: {}", source.display(), err);
                ok = false;
            }
        }
    }

    Ok(ok)
}

fn sources(path: &Path) -> io::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?.path();

        if entry.extension().is_some_and(|ext| ext == "jack") {
            sources.push(entry);
        }
    }

    sources.sort();
    Ok(sources)
}

/// Compiles one source to a sibling `.vm` file. Whatever was emitted
/// before a failure is flushed, so a diagnosed compilation still leaves
/// its partial output behind.
fn compile_file(source: &Path) -> Result<PathBuf, CompileError> {
    let mut reader = BufReader::new(File::open(source)?);

    let output = source.with_extension("vm");
    let mut writer = BufWriter::new(File::create(&output)?);

    let result = analyse(&mut reader, &mut writer);
    writer.flush()?;
    result?;

    Ok(output)
}
