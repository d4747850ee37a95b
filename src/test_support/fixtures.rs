//! Archive fixtures.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::sources::archive::ArchiveResolver;
use crate::sources::verify::VerifiedArchive;
use crate::util::hash::sha256_bytes;

/// A small stand-in for the amalgamation zip, laid out like the real one:
/// a single `<stem>/` directory holding the sources.
pub fn amalgamation_zip(stem: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.add_directory(format!("{}/", stem), options).unwrap();
    for (name, contents) in [
        (
            "sqlite3.c",
            "/* amalgamation */\nint sqlite3_libversion_number(void){ return 3028000; }\n",
        ),
        ("sqlite3.h", "#define SQLITE_VERSION \"3.28.0\"\n"),
        ("sqlite3ext.h", "#include \"sqlite3.h\"\n"),
        ("shell.c", "int main(void){ return 0; }\n"),
    ] {
        zip.start_file(format!("{}/{}", stem, name), options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Wrap `bytes` as a verified 3.28.0 archive.
pub fn verified(bytes: Vec<u8>) -> VerifiedArchive {
    let reference = ArchiveResolver::new("https://www.sqlite.org/", 2019, sha256_bytes(&bytes))
        .unwrap()
        .resolve("3.28.0")
        .unwrap();
    VerifiedArchive::new(reference, bytes).unwrap()
}
