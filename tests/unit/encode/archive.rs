use super::*;

fn u16_at(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn u32_at(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// Walk the central directory and return (name, payload) pairs.
fn read_entries(zip: &[u8]) -> Vec<(String, Vec<u8>)> {
    let eocd = zip.len() - 22;
    assert_eq!(u32_at(zip, eocd), SIG_EOCD);
    let count = u16_at(zip, eocd + 10) as usize;
    let mut cd = u32_at(zip, eocd + 16) as usize;

    let mut out = Vec::new();
    for _ in 0..count {
        assert_eq!(u32_at(zip, cd), SIG_CD_ENTRY);
        let crc = u32_at(zip, cd + 16);
        let size = u32_at(zip, cd + 20) as usize;
        let name_len = u16_at(zip, cd + 28) as usize;
        let local = u32_at(zip, cd + 42) as usize;
        let name = String::from_utf8(zip[cd + 46..cd + 46 + name_len].to_vec()).unwrap();

        assert_eq!(u32_at(zip, local), SIG_LOCAL_FILE_HEADER);
        assert_eq!(u16_at(zip, local + 8), METHOD_STORED);
        let local_name_len = u16_at(zip, local + 26) as usize;
        let data_at = local + 30 + local_name_len;
        let data = zip[data_at..data_at + size].to_vec();
        assert_eq!(crc32fast::hash(&data), crc);

        out.push((name, data));
        cd += 46 + name_len;
    }
    out
}

#[test]
fn entries_survive_in_order() {
    let mut zip = ZipArchiveBuilder::new();
    zip.add_entry("fantasy-overlay-001.png", b"first").unwrap();
    zip.add_entry("fantasy-overlay-002.png", b"second payload").unwrap();
    assert_eq!(zip.len(), 2);
    let bytes = zip.finalize().unwrap();

    let entries = read_entries(&bytes);
    assert_eq!(
        entries,
        vec![
            ("fantasy-overlay-001.png".to_string(), b"first".to_vec()),
            (
                "fantasy-overlay-002.png".to_string(),
                b"second payload".to_vec()
            ),
        ]
    );
}

#[test]
fn empty_archive_is_just_an_eocd() {
    let bytes = ZipArchiveBuilder::new().finalize().unwrap();
    assert_eq!(bytes.len(), 22);
    assert!(read_entries(&bytes).is_empty());
}

#[test]
fn output_is_reproducible() {
    let build = || {
        let mut zip = ZipArchiveBuilder::new();
        zip.add_entry("a.png", &[1, 2, 3]).unwrap();
        zip.finalize().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn bad_names_are_rejected() {
    let mut zip = ZipArchiveBuilder::new();
    zip.add_entry("a.png", b"x").unwrap();
    for name in ["", "/abs.png", "../up.png", "dir/../x.png", "a.png"] {
        let err = zip.add_entry(name, b"y").unwrap_err();
        assert!(matches!(err, OverlayError::Archive(_)), "{name}: {err}");
    }
    assert_eq!(zip.len(), 1);
}
