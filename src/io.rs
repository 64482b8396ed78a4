// io.rs - Walks on disk as a dim x (N+1) integer table (one CSV row per axis)

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{Result, SawError};
use crate::lattice::Walk;

/// Write `walk` as `dim` CSV rows of `N+1` coordinates each.
pub fn write_walk<W: Write>(walk: &Walk, out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    for axis in 0..walk.dim() {
        wtr.write_record(walk.sites().map(|s| s[axis].to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a walk written by [`write_walk`], validating it.
pub fn read_walk<R: Read>(input: R) -> Result<Walk> {
    let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(input);
    let mut rows: Vec<Vec<i32>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| field.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let dim = rows.len();
    let n_sites = rows.first().map_or(0, Vec::len);
    if dim == 0 || n_sites == 0 {
        return Err(SawError::InvalidWalk("empty walk table".into()));
    }
    let mut coords = Vec::with_capacity(dim * n_sites);
    for i in 0..n_sites {
        for row in &rows {
            coords.push(row[i]);
        }
    }
    Walk::from_sites(dim, coords)
}

pub fn save_walk(walk: &Walk, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_walk(walk, std::io::BufWriter::new(file))
}

pub fn load_walk(path: impl AsRef<Path>) -> Result<Walk> {
    let file = std::fs::File::open(path)?;
    read_walk(std::io::BufReader::new(file))
}
