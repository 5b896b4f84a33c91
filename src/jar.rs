//! Reading class files and manifests out of JAR archives.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Error;
use crate::manifest::Manifest;

/// The maximum number of bytes read from a single JAR entry in one
/// `read` call. An entry's total size can exceed what fits in one
/// allocation-friendly chunk; reading in bounded steps and appending
/// keeps memory use predictable regardless of how large the entry
/// declares itself to be, which matters for entries whose declared size
/// overflows a 32-bit read.
const READ_CHUNK: usize = 1 << 20;

/// An opened JAR archive.
pub struct Jar {
    archive: zip::ZipArchive<BufReader<File>>,
}

impl std::fmt::Debug for Jar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jar")
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl Jar {
    /// Opens the JAR file at `path`, reading its central directory.
    ///
    /// # Errors
    /// [`Error::FileInaccessible`] if the file cannot be opened or its
    /// central directory cannot be located.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::FileInaccessible {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|err| Error::FileInaccessible {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Ok(Self { archive })
    }

    /// The archive's entry names, in central-directory order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    /// Opens `name` and reads its full, decompressed contents.
    ///
    /// Returns `Ok(None)` if no entry is named `name`, rather than an
    /// error: an absent entry is a normal outcome for a caller probing a
    /// JAR's contents. An entry declaring zero size yields `Some(vec![])`
    /// without ever opening its stream.
    ///
    /// Reads in bounded chunks rather than one `read_to_end` call, so an
    /// entry whose declared uncompressed size exceeds what one `read`
    /// call can return doesn't stall or truncate.
    ///
    /// # Errors
    /// [`Error::Io`] if the entry exists but its stream cannot be read
    /// to completion.
    pub fn open_binary(&mut self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(Error::Io(std::io::Error::other(err))),
        };
        if file.size() == 0 {
            return Ok(Some(Vec::new()));
        }
        let expected = usize::try_from(file.size()).unwrap_or(usize::MAX);
        let mut contents = Vec::with_capacity(expected.min(READ_CHUNK));
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let read = file.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            contents.extend_from_slice(&chunk[..read]);
        }
        Ok(Some(contents))
    }

    /// As [`Jar::open_binary`], decoding the result as UTF-8 (lossily,
    /// since manifest and resource text files are not guaranteed to be
    /// strict UTF-8 in the wild).
    ///
    /// # Errors
    /// [`Error::Io`] if the entry exists but cannot be read.
    pub fn open_text(&mut self, name: &str) -> Result<Option<String>, Error> {
        Ok(self
            .open_binary(name)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Reads and parses `META-INF/MANIFEST.MF`. An archive with no
    /// manifest entry yields an empty [`Manifest`], not an error.
    ///
    /// # Errors
    /// [`Error::Io`] if the entry exists but cannot be read, or
    /// [`Error::ManifestParse`] if its contents don't match the grammar.
    pub fn manifest(&mut self) -> Result<Manifest, Error> {
        match self.open_text("META-INF/MANIFEST.MF")? {
            Some(text) => Manifest::parse(&text),
            None => Ok(Manifest::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScratchFile(PathBuf);

    impl Drop for ScratchFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn build_jar(entries: &[(&str, &[u8])]) -> ScratchFile {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let mut path = std::env::temp_dir();
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!(
            "jclass-reader-test-{}-{unique}.jar",
            std::process::id()
        ));

        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        for (name, contents) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
        ScratchFile(path)
    }

    #[test]
    fn lists_and_reads_entries() {
        let file = build_jar(&[
            ("A.class", b"hello"),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
        ]);
        let mut jar = Jar::open(&file.0).unwrap();
        let names: Vec<_> = jar.list().map(str::to_string).collect();
        assert!(names.contains(&"A.class".to_string()));
        assert_eq!(jar.open_binary("A.class").unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn absent_entry_is_none_not_error() {
        let file = build_jar(&[("A.class", b"hello")]);
        let mut jar = Jar::open(&file.0).unwrap();
        assert_eq!(jar.open_binary("Missing.class").unwrap(), None);
    }

    #[test]
    fn every_listed_entry_opens() {
        let file = build_jar(&[
            ("A.class", b"hello"),
            ("B.class", b""),
            ("dir/C.class", b"x"),
        ]);
        let mut jar = Jar::open(&file.0).unwrap();
        let names: Vec<String> = jar.list().map(str::to_string).collect();
        for name in names {
            assert!(jar.open_binary(&name).unwrap().is_some());
        }
    }

    #[test]
    fn reads_manifest_when_present() {
        let file = build_jar(&[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n")]);
        let mut jar = Jar::open(&file.0).unwrap();
        let manifest = jar.manifest().unwrap();
        assert_eq!(
            manifest
                .main_attributes()
                .unwrap()
                .get("Manifest-Version")
                .map(String::as_str),
            Some("1.0")
        );
    }

    #[test]
    fn missing_manifest_is_empty_not_error() {
        let file = build_jar(&[("A.class", b"hello")]);
        let mut jar = Jar::open(&file.0).unwrap();
        assert_eq!(jar.manifest().unwrap(), Manifest::default());
    }

    #[test]
    fn opening_a_nonexistent_path_is_file_inaccessible() {
        let err = Jar::open("/nonexistent/path/does-not-exist.jar").unwrap_err();
        assert!(matches!(err, Error::FileInaccessible { .. }));
    }
}
