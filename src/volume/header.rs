//! Detached NRRD header output

use log::{info, warn};
use std::fs::{self, File};
use std::io::Write;

use crate::tiff::{TiffError, TiffResult};

use super::descriptor::VolumeDescriptor;

/// Renders the detached header describing `volume`
///
/// `data_file` is written exactly as given so the header resolves the raw
/// file the same way the caller named it.
pub fn render_header(volume: &VolumeDescriptor, data_file: &str) -> String {
    format!(
        "NRRD0002\n\
         dimension: 3\n\
         sizes: {} {} {}\n\
         type: {}\n\
         encoding: raw\n\
         data file: {}\n",
        volume.width, volume.height, volume.depth, volume.nrrd_type(), data_file,
    )
}

/// Writes the header for `volume` to `header_path`
///
/// On failure nothing is left behind at `header_path`.
pub fn write_header(volume: &VolumeDescriptor, data_file: &str, header_path: &str) -> TiffResult<()> {
    let text = render_header(volume, data_file);

    let file = File::create(header_path).map_err(|e| TiffError::output(header_path, e))?;
    write_or_remove(file, text.as_bytes(), header_path)?;

    info!("Wrote NRRD header {} (type {})", header_path, volume.nrrd_type());
    Ok(())
}

/// Writes `bytes` to `out`, which was just created at `path`
///
/// If the write fails `out` is closed and `path` deleted.
fn write_or_remove<W: Write>(mut out: W, bytes: &[u8], path: &str) -> TiffResult<()> {
    if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
        drop(out);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!("Could not remove partial header {}: {}", path, remove_err);
        }
        return Err(TiffError::output(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    /// Lets `budget` bytes through to the file, then fails like a full disk
    struct FillingWriter {
        file: File,
        budget: usize,
    }

    impl Write for FillingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            self.file.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.file.flush()
        }
    }

    #[test]
    fn failed_write_removes_the_partial_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vol.nhdr");
        let path_str = path.to_str().unwrap();
        let writer = FillingWriter { file: File::create(&path).unwrap(), budget: 10 };

        match write_or_remove(writer, b"NRRD0002\ndimension: 3\n", path_str) {
            Err(TiffError::CannotWriteOutput { path: reported, source }) => {
                assert_eq!(reported, path_str);
                assert_eq!(source.to_string(), "no space left on device");
            },
            other => panic!("expected CannotWriteOutput, got {:?}", other),
        }
        assert!(!Path::new(path_str).exists());
    }

    #[test]
    fn complete_write_keeps_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vol.nhdr");
        let path_str = path.to_str().unwrap();

        write_or_remove(File::create(&path).unwrap(), b"NRRD0002\n", path_str).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "NRRD0002\n");
    }
}
