use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use ni_name::{
    AlgorithmRegistry, EngineOptions, Name, NiDigester, NiEngine, NiError, STANDARD_SUITES, Scheme,
    SuiteSelector,
};
use tempfile::{TempDir, tempdir};

const SAMPLE: &[u8] = b"{\"image\": \"not really an image\", \"bytes\": [1, 2, 3]}\n";

fn engine() -> NiEngine { NiEngine::new(AlgorithmRegistry::shared()) }

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_generate_then_verify_file() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let engine = engine();

    let mut name = Name::from_uri("ni://tcd.ie/sha-256;?c=image%2Fjson").unwrap();
    engine.generate_file(&mut name, &path).unwrap();

    assert_eq!(name.params().len(), 43);
    assert!(name.url().starts_with("ni://tcd.ie/sha-256;"));
    assert!(name.url().ends_with("?c=image%2Fjson"));
    engine.verify_file(&mut name, &path).unwrap();

    // a fresh parse of the generated URI verifies too
    let mut reparsed: Name = name.url().parse().unwrap();
    engine.verify_file(&mut reparsed, &path).unwrap();
}

#[test]
fn test_verify_against_different_file() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let other = write_file(&dir, "other.json", b"{}\n");
    let engine = engine();

    let mut name = Name::from_uri("ni://tcd.ie/sha-256;?c=image%2Fjson").unwrap();
    engine.generate_file(&mut name, &path).unwrap();
    assert!(matches!(engine.verify_file(&mut name, &other), Err(NiError::BadHash)));
}

#[test]
fn test_nih_check_digit_may_be_stripped() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let engine = engine();

    let mut name = Name::from_uri("nih:sha-256-32;").unwrap();
    engine.generate_file(&mut name, &path).unwrap();

    let params = name.params().to_string();
    assert_eq!(params.len(), 10);
    let (hex, check) = params.split_once(';').unwrap();
    assert_eq!(hex.len(), 8);
    assert_eq!(check.len(), 1);

    let stripped = &name.url()[..name.url().len() - 2];
    let mut stripped = Name::from_uri(stripped).unwrap();
    assert_eq!(stripped.params(), hex);
    engine.verify_file(&mut stripped, &path).unwrap();
}

#[test]
fn test_unregistered_suite_number() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let engine = engine();

    let mut name = Name::from_uri("nih:11;").unwrap();
    assert!(matches!(name.validate(engine.registry(), false), Err(NiError::BadAlg)));
    assert!(matches!(engine.generate_file(&mut name, &path), Err(NiError::BadAlg)));
}

#[test]
fn test_missing_params_when_expected() {
    let mut name = Name::from_uri("ni://host/sha-256").unwrap();
    assert!(matches!(name.validate(&AlgorithmRegistry::standard(), true), Err(NiError::BadUrl)));
}

#[test]
fn test_binary_tagged_file() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let engine = engine();

    let tagged = engine.binary_tagged_file(SuiteSelector::Number(6), &path).unwrap();
    let bytes = tagged.to_bytes();
    assert_eq!(bytes.len(), 1 + 4);
    assert_eq!(bytes[0], 6);

    // the tag carries the same digest the nih name shows in hex
    let mut name = Name::from_uri("nih:6").unwrap();
    engine.generate_file(&mut name, &path).unwrap();
    assert!(name.params().starts_with(&hex::encode(tagged.as_digest())));

    assert!(matches!(
        engine.binary_tagged_file(SuiteSelector::Number(11), &path),
        Err(NiError::BadAlg)
    ));
}

#[test]
fn test_round_trip_every_suite_and_scheme() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "sample.json", SAMPLE);
    let engine = engine();

    for suite in STANDARD_SUITES {
        let templates = [format!("ni://example.com/{}", suite.name), format!("nih:{}", suite.name)];
        for template in templates {
            let mut name = Name::from_uri(&template).unwrap();
            engine.generate_file(&mut name, &path).unwrap();
            let expected_len = match name.scheme().unwrap() {
                Scheme::Ni => suite.encoded_len,
                Scheme::Nih => suite.hex_len() + 2,
            };
            assert_eq!(name.params().len(), expected_len, "{template}");
            engine.verify_file(&mut name, &path).unwrap();
            engine.verify_buffer(&mut name, SAMPLE).unwrap();
        }
    }
}

#[test]
fn test_single_character_tamper_is_detected() {
    let engine = engine();
    let mut name = Name::from_uri("ni:///sha-256-64").unwrap();
    engine.generate_buffer(&mut name, SAMPLE).unwrap();
    let original = name.params().to_string();

    for i in 0..original.len() {
        let mut tampered = original.clone().into_bytes();
        tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
        let mut name = name.clone();
        name.set_params(String::from_utf8(tampered).unwrap());
        assert!(
            matches!(engine.verify_buffer(&mut name, SAMPLE), Err(NiError::BadHash)),
            "position {i}"
        );
    }
}

#[test]
fn test_missing_file_is_bad_file() {
    let dir = tempdir().unwrap();
    let engine = engine();

    let mut name = Name::from_uri("ni:///sha-256").unwrap();
    let err = engine.generate_file(&mut name, dir.path().join("absent")).unwrap_err();
    match err {
        NiError::BadFile(source) => assert_eq!(source.kind(), io::ErrorKind::NotFound),
        other => panic!("expected BadFile, got {other:?}"),
    }

    let mut full = Name::from_uri("ni:///sha-256-32;f4OxZQ").unwrap();
    assert!(matches!(
        engine.verify_file(&mut full, dir.path().join("absent")),
        Err(NiError::BadFile(_))
    ));
}

#[test]
fn test_file_buffer_and_digester_agree() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let path = write_file(&dir, "large.bin", &content);

    for chunk in [1, 1000, 1024, 4096] {
        let engine = NiEngine::new(AlgorithmRegistry::shared())
            .with_options(EngineOptions::default().chunk_size(chunk));

        let mut from_file = Name::from_uri("nih:sha-256-120").unwrap();
        engine.generate_file(&mut from_file, &path).unwrap();

        let mut from_buffer = Name::from_uri("nih:sha-256-120").unwrap();
        engine.generate_buffer(&mut from_buffer, &content).unwrap();

        let mut digester = NiDigester::new(AlgorithmRegistry::shared());
        digester.bind("nih:sha-256-120").unwrap();
        let mut reader = &content[..];
        io::copy(&mut reader, &mut digester).unwrap();
        let streamed = digester.finalize().unwrap().url().to_string();

        assert_eq!(from_file.url(), from_buffer.url(), "chunk {chunk}");
        assert_eq!(from_file.url(), streamed, "chunk {chunk}");
    }
}

#[test]
fn test_translation_of_generated_names() {
    let engine = engine();

    let mut ni = Name::from_uri("ni:///sha-256-96").unwrap();
    engine.generate_buffer(&mut ni, SAMPLE).unwrap();
    let mut nih = Name::from_uri("nih:sha-256-96").unwrap();
    engine.generate_buffer(&mut nih, SAMPLE).unwrap();

    assert_eq!(ni.url_as_nih().unwrap(), nih.url());
    assert_eq!(nih.url_as_ni().unwrap(), ni.url());

    nih.convert_to_ni().unwrap();
    engine.verify_buffer(&mut nih, SAMPLE).unwrap();
    assert_eq!(nih.url(), ni.url());
}

#[test]
fn test_concurrent_suite_number_lookup() {
    let registry = Arc::new(AlgorithmRegistry::standard());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let engine = NiEngine::new(registry);
                let mut name = Name::from_uri(&format!("nih:{}", 1 + i % 6)).unwrap();
                engine.generate_buffer(&mut name, SAMPLE).unwrap();
                engine.verify_buffer(&mut name, SAMPLE).unwrap();
                name.algorithm_name().unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = registry.by_suite_number(1 + (i % 6) as u8).unwrap().name;
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_oversized_chunk_size_hashes_small_file() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "tiny.txt", b"abc");
    let engine = NiEngine::new(AlgorithmRegistry::shared())
        .with_options(EngineOptions::default().chunk_size(usize::MAX / 2));

    let mut name = Name::from_uri("ni:///sha-256").unwrap();
    engine.generate_file(&mut name, &path).unwrap();
    assert_eq!(name.url(), "ni:///sha-256;ungWv48Bz-pBQUDeXa4iI7ADYaOWF3qctBD_YfIAFa0");
    engine.verify_file(&mut name, &path).unwrap();
}
