use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use skew_engine::{Element, ElementKind, EngineConfig, Matrix, MatrixPair};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Run manifest saved next to the generated streams (run.json)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RunManifest {
    /// Configuration the streams were produced under
    pub config: EngineConfig,
    /// Wire frame file name, relative to the manifest
    pub wire_path: String,
    /// Reference stream file name, relative to the manifest
    pub reference_path: String,
    /// Hex SHA-256 of the wire frame
    pub wire_sha256: String,
    /// Hex SHA-256 of the reference stream
    pub reference_sha256: String,
}

pub const MANIFEST_NAME: &str = "run.json";

/// Reference stream name used when neither a flag nor a manifest names one
pub const DEFAULT_REFERENCE_NAME: &str = "output.bin";

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Load an n×n matrix from a JSON array of rows
pub fn load_matrix<T, P>(path: P) -> Result<Matrix<T>>
where
    T: Element + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let rows: Vec<Vec<T>> = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Matrix::from_rows(rows)?)
}

pub fn save_matrix<T, P>(path: P, matrix: &Matrix<T>) -> Result<()>
where
    T: Element + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &matrix.to_rows())?;
    writer.flush()?;
    Ok(())
}

/// Load both operands, interpreting them as `kind`
pub fn load_pair<P: AsRef<Path>>(a_path: P, b_path: P, kind: ElementKind) -> Result<MatrixPair> {
    let pair = match kind {
        ElementKind::Int32 => MatrixPair::int32(load_matrix(a_path)?, load_matrix(b_path)?)?,
        ElementKind::Float32 => MatrixPair::float32(load_matrix(a_path)?, load_matrix(b_path)?)?,
    };
    Ok(pair)
}

pub fn save_pair<P: AsRef<Path>>(a_path: P, b_path: P, pair: &MatrixPair) -> Result<()> {
    match pair {
        MatrixPair::Int32(a, b) => {
            save_matrix(a_path, a)?;
            save_matrix(b_path, b)
        }
        MatrixPair::Float32(a, b) => {
            save_matrix(a_path, a)?;
            save_matrix(b_path, b)
        }
    }
}

/// Write a binary stream; the file is flushed and closed before returning
pub fn write_stream<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

pub fn read_stream<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

pub fn save_manifest<P: AsRef<Path>>(path: P, manifest: &RunManifest) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, manifest)?;
    Ok(())
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<RunManifest> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let manifest: RunManifest = serde_json::from_reader(reader)?;
    Ok(manifest)
}
