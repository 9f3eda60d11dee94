#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Path for a file the test expects the binary to create.
    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Three scraped listings: one missing its rating, one with a decorated
/// review count, one fully populated.
pub const SAMPLE_LISTINGS: &str = "\
name,brand,old_price_reais,old_price_centavos,new_price_reais,new_price_centavos,reviews_rating_number,reviews_amount
Tenis Corrida A,Nike,249,90,199,99,,(42)
Tenis Corrida B,Fila,,,89,90,4.2,(10)
Tenis Corrida C,Olympikus,19,90,15,0,4.8,(7)
";
