use crate::data::bar::Bar;
use crate::data::loader::{load_csv, write_csv};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

//directory-backed price store with an in-memory layer
//
//the cache is an explicit object passed to whoever needs data: nothing in the
//crate keeps process-wide state, and invalidation is a method call rather than
//a restart
pub struct PriceCache {
    dir: PathBuf,
    loaded: HashMap<String, Vec<Bar>>,
}

impl PriceCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        PriceCache {
            dir: dir.as_ref().to_path_buf(),
            loaded: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }

    //returns the bars for a symbol, reading from disk on first access
    pub fn load(&mut self, symbol: &str) -> Result<&[Bar]> {
        if !self.loaded.contains_key(symbol) {
            let path = self.path_for(symbol);
            let bars = load_csv(&path)
                .context(format!("No cached data for symbol {} ({:?})", symbol, path))?;
            self.loaded.insert(symbol.to_string(), bars);
        }

        Ok(self.loaded[symbol].as_slice())
    }

    //writes bars for a symbol to the cache directory and the in-memory layer
    pub fn store(&mut self, symbol: &str, bars: &[Bar]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .context(format!("Failed to create cache directory {:?}", self.dir))?;
        write_csv(bars, self.path_for(symbol))?;
        self.loaded.insert(symbol.to_string(), bars.to_vec());
        Ok(())
    }

    //drops the in-memory copy; the next load re-reads the file
    pub fn invalidate(&mut self, symbol: &str) {
        self.loaded.remove(symbol);
    }

    //lists the symbols present in the cache directory, sorted
    pub fn symbols(&self) -> Result<Vec<String>> {
        let mut symbols = Vec::new();

        if !self.dir.exists() {
            return Ok(symbols);
        }

        for entry in std::fs::read_dir(&self.dir)
            .context(format!("Failed to read cache directory {:?}", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

//normalizes an exported ohlcv csv into the cache under the given symbol
//acquisition itself (download, API access) happens outside this crate
pub fn import_raw_csv<P: AsRef<Path>>(
    cache: &mut PriceCache,
    symbol: &str,
    input: P,
) -> Result<usize> {
    let bars = load_csv(input)?;
    if bars.is_empty() {
        anyhow::bail!("No parseable rows in input file for symbol {}", symbol);
    }
    cache.store(symbol, &bars)?;
    Ok(bars.len())
}
