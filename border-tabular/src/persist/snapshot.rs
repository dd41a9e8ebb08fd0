//! Binary snapshot of the table.
use super::{load_error, write_error};
use crate::{
    error::{Result, TabularError},
    Action, QTable, State,
};
use bincode::Options;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Format version written in front of the entries.
pub(super) const VERSION: u32 = 1;

pub(super) fn write<S: State, A: Action>(table: &QTable<S, A>, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(write_error(path))?;
    let mut wtr = BufWriter::new(file);
    bincode::serialize_into(&mut wtr, &VERSION).map_err(write_error(path))?;
    bincode::serialize_into(&mut wtr, table).map_err(write_error(path))?;
    wtr.flush().map_err(write_error(path))?;
    Ok(())
}

/// Decoding options matching the layout of `bincode::serialize`, with the
/// number of decoded bytes bounded by `limit`.
fn read_options(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

pub(super) fn read<S: State, A: Action>(path: &Path) -> Result<QTable<S, A>> {
    let file = File::open(path).map_err(load_error(path))?;
    // A length prefix can never exceed the file, so corrupt lengths fail instead of allocating.
    let limit = file.metadata().map_err(load_error(path))?.len();
    let mut rdr = BufReader::new(file);
    let version: u32 = read_options(limit)
        .deserialize_from(&mut rdr)
        .map_err(load_error(path))?;
    if version != VERSION {
        return Err(TabularError::Load {
            path: path.to_owned(),
            source: format!(
                "unsupported snapshot version {}, expected {}",
                version, VERSION
            )
            .into(),
        });
    }
    let table = read_options(limit)
        .deserialize_from(&mut rdr)
        .map_err(load_error(path))?;
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_exact_bits() -> anyhow::Result<()> {
        let dir = TempDir::new("snapshot")?;
        let path = dir.path().join("q.bin");

        let values = [0.1 + 0.2, -0.0, f64::MIN_POSITIVE, 1e300, f64::INFINITY];
        let mut table = QTable::<(u8, u8), String>::new();
        for (i, v) in values.iter().enumerate() {
            table.set((i as u8, 1), "go".to_string(), *v);
        }
        write(&table, &path)?;
        let table_ = read::<(u8, u8), String>(&path)?;

        assert_eq!(table_.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            let v_ = table_.get(&(i as u8, 1), &"go".to_string());
            assert_eq!(v_.to_bits(), v.to_bits());
        }
        Ok(())
    }

    #[test]
    fn test_version_mismatch() -> anyhow::Result<()> {
        let dir = TempDir::new("snapshot")?;
        let path = dir.path().join("q.bin");
        let mut file = File::create(&path)?;
        file.write_all(&bincode::serialize(&(VERSION + 1))?)?;
        file.write_all(&bincode::serialize(&QTable::<u8, u8>::new())?)?;
        drop(file);

        match read::<u8, u8>(&path) {
            Err(TabularError::Load { source, .. }) => {
                assert!(source.to_string().contains("unsupported snapshot version"));
            }
            r => panic!("unexpected result: {:?}", r),
        }
        Ok(())
    }

    #[test]
    fn test_corrupt_length_prefix() -> anyhow::Result<()> {
        let dir = TempDir::new("snapshot")?;
        let path = dir.path().join("q.bin");
        let mut file = File::create(&path)?;
        file.write_all(&VERSION.to_le_bytes())?;
        file.write_all(&1u64.to_le_bytes())?;
        // String length far beyond the file size.
        file.write_all(&(1u64 << 46).to_le_bytes())?;
        file.write_all(b"ab")?;
        drop(file);

        assert!(matches!(
            read::<String, String>(&path),
            Err(TabularError::Load { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_truncated() -> anyhow::Result<()> {
        let dir = TempDir::new("snapshot")?;
        let path = dir.path().join("q.bin");
        let mut table = QTable::<u8, u8>::new();
        table.set(1, 2, 3.0);
        write(&table, &path)?;

        let bytes = std::fs::read(&path)?;
        std::fs::write(&path, &bytes[..bytes.len() - 3])?;
        assert!(matches!(read::<u8, u8>(&path), Err(TabularError::Load { .. })));
        Ok(())
    }
}
