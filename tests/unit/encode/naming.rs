use std::collections::HashSet;
use std::path::PathBuf;

use super::*;
use crate::catalog::scan::{LayerCatalog, LayerCategory};
use crate::foundation::core::CanvasSize;

fn catalog() -> LayerCatalog {
    LayerCatalog::from_categories(vec![
        LayerCategory::new(
            "background",
            vec![
                PathBuf::from("./layers/background/a.png"),
                PathBuf::from("./layers/background/b.png"),
            ],
        )
        .unwrap(),
        LayerCategory::new("shape", vec![PathBuf::from("./layers/shape/x.jpg")]).unwrap(),
    ])
    .unwrap()
}

#[test]
fn naming_key_joins_paths_with_single_space() {
    let cat = catalog();
    let keys: Vec<Vec<u8>> = cat.combinations().unwrap().map(|c| naming_key(&c)).collect();
    assert_eq!(
        keys,
        vec![
            b"./layers/background/a.png ./layers/shape/x.jpg".to_vec(),
            b"./layers/background/b.png ./layers/shape/x.jpg".to_vec(),
        ]
    );
}

#[test]
fn identifier_is_hash_of_naming_key() {
    let combo = catalog().combination_at(0).unwrap();
    let expected = format!(
        "{:032x}",
        xxh3_128(b"./layers/background/a.png ./layers/shape/x.jpg")
    );
    assert_eq!(output_identifier(&combo), expected);
    assert_eq!(output_file_name(&combo), format!("{expected}.jpg"));
}

#[test]
fn identifier_is_deterministic_and_fixed_width() {
    let cat = catalog();
    let a = output_identifier(&cat.combination_at(1).unwrap());
    let b = output_identifier(&cat.combination_at(1).unwrap());
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn distinct_combinations_get_distinct_names() {
    let cat = catalog();
    let names: HashSet<String> = cat
        .combinations()
        .unwrap()
        .map(|c| output_file_name(&c))
        .collect();
    assert_eq!(names.len(), 2);
}

#[cfg(unix)]
#[test]
fn non_utf8_file_names_get_distinct_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let bg = PathBuf::from("./layers/bg");
    let cat = LayerCatalog::from_categories(vec![
        LayerCategory::new(
            "bg",
            vec![
                bg.join(OsStr::from_bytes(b"\xff.png")),
                bg.join(OsStr::from_bytes(b"\xfe.png")),
            ],
        )
        .unwrap(),
    ])
    .unwrap();

    let ids: Vec<String> = cat
        .combinations()
        .unwrap()
        .map(|c| output_identifier(&c))
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(
        ids[0],
        format!("{:032x}", xxh3_128(b"./layers/bg/\xff.png"))
    );
}

#[test]
fn identifier_depends_on_layer_order() {
    assert_ne!(identifier_for_key("a b"), identifier_for_key("b a"));
}

#[test]
fn artifact_carries_identifier_and_jpeg_bytes() {
    let combo = catalog().combination_at(0).unwrap();
    let raster = Raster::transparent(CanvasSize::new(2, 2).unwrap()).unwrap();
    let artifact = OutputArtifact::encode(&combo, &raster, 75).unwrap();
    assert_eq!(artifact.identifier, output_identifier(&combo));
    assert_eq!(artifact.file_name(), output_file_name(&combo));
    assert_eq!(&artifact.bytes[..2], &[0xFF, 0xD8]);
}
