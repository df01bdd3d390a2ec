//! End-to-end tests: load from disk, clean, save, read back.

use imgclean::codec::{load_image, ppm, save_image};
use imgclean::{CleanConfig, ColorImage, Error, PpmError, Strategy, clean_and_save, clean_file};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Gray level of every pixel, asserting R = G = B.
fn gray_levels(image: &ColorImage) -> Vec<u16> {
    image
        .as_samples()
        .chunks_exact(3)
        .map(|px| {
            assert!(px[0] == px[1] && px[1] == px[2], "channels differ: {:?}", px);
            px[0]
        })
        .collect()
}

fn config(strategy: Strategy) -> CleanConfig {
    CleanConfig::default().with_strategy(strategy)
}

#[test]
fn test_adaptive_reference_ppm() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ppm");

    let report = clean_file(&fixture("3x3-test.ppm"), &output, &config(Strategy::Adaptive)).unwrap();
    assert_eq!((report.width, report.height), (3, 3));
    assert_eq!(report.strategy, Strategy::Adaptive);
    assert_eq!(report.ink.total_pixels, 9);
    assert_eq!(report.ink.ink_pixels, 6);

    let cleaned = ppm::read_ppm(&output).unwrap();
    assert_eq!((cleaned.width(), cleaned.height(), cleaned.maxval()), (3, 3, 255));
    assert_eq!(cleaned.as_samples().len(), 27);
    assert_eq!(gray_levels(&cleaned), vec![0, 255, 0, 255, 0, 0, 255, 0, 0]);
}

#[test]
fn test_integral_reference_ppm() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ppm");

    clean_file(&fixture("3x3-test.ppm"), &output, &config(Strategy::Integral)).unwrap();

    let levels = gray_levels(&ppm::read_ppm(&output).unwrap());
    // White stays background, black becomes ink
    assert_eq!(levels[3], 255);
    assert_eq!(levels[5], 0);
    assert_eq!(levels, vec![0, 255, 0, 255, 255, 0, 255, 255, 0]);
}

#[test]
fn test_sequential_output_matches_parallel() {
    let dir = TempDir::new().unwrap();
    for strategy in [Strategy::Adaptive, Strategy::Integral] {
        let par = dir.path().join(format!("{}-par.ppm", strategy));
        let seq = dir.path().join(format!("{}-seq.ppm", strategy));
        let sequential = CleanConfig {
            parallel: false,
            ..config(strategy)
        };

        clean_file(&fixture("3x3-test.ppm"), &par, &config(strategy)).unwrap();
        clean_file(&fixture("3x3-test.ppm"), &seq, &sequential).unwrap();
        assert_eq!(fs::read(&par).unwrap(), fs::read(&seq).unwrap());
    }
}

#[test]
fn test_clean_loaded_image_matches_clean_file() {
    let dir = TempDir::new().unwrap();
    let from_file = dir.path().join("from-file.ppm");
    let from_image = dir.path().join("from-image.ppm");

    clean_file(&fixture("3x3-test.ppm"), &from_file, &CleanConfig::default()).unwrap();
    let image = load_image(&fixture("3x3-test.ppm")).unwrap();
    let report = clean_and_save(image, &from_image, &CleanConfig::default()).unwrap();

    assert_eq!((report.width, report.height), (3, 3));
    assert_eq!(fs::read(&from_image).unwrap(), fs::read(&from_file).unwrap());
}

#[test]
fn test_png_output_matches_ppm_output() {
    let dir = TempDir::new().unwrap();
    let as_ppm = dir.path().join("out.ppm");
    let as_png = dir.path().join("out.png");

    clean_file(&fixture("3x3-test.ppm"), &as_ppm, &config(Strategy::Adaptive)).unwrap();
    clean_file(&fixture("3x3-test.ppm"), &as_png, &config(Strategy::Adaptive)).unwrap();

    let from_ppm = load_image(&as_ppm).unwrap();
    let from_png = load_image(&as_png).unwrap();
    assert_eq!(from_png.as_samples(), from_ppm.as_samples());
}

#[test]
fn test_png_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("page.png");
    let output = dir.path().join("page-clean.ppm");

    // 20x20 light page with a two-pixel vertical stroke
    let (w, h) = (20, 20);
    let rgb: Vec<u16> = (0..w * h)
        .flat_map(|i| {
            let v = if matches!(i % w, 10 | 11) { 30 } else { 200 };
            [v, v, v]
        })
        .collect();
    save_image(&input, &ColorImage::new(w, h, 255, rgb).unwrap()).unwrap();

    for strategy in [Strategy::Adaptive, Strategy::Integral] {
        clean_file(&input, &output, &config(strategy)).unwrap();
        let levels = gray_levels(&ppm::read_ppm(&output).unwrap());
        for (i, &level) in levels.iter().enumerate() {
            let expected = if matches!(i % w, 10 | 11) { 0 } else { 255 };
            assert_eq!(level, expected, "{} at ({}, {})", strategy, i % w, i / w);
        }
    }
}

#[test]
fn test_jpeg_output_is_readable() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.jpg");

    clean_file(&fixture("3x3-test.ppm"), &output, &CleanConfig::default()).unwrap();
    let reloaded = load_image(&output).unwrap();
    assert_eq!((reloaded.width(), reloaded.height()), (3, 3));
}

#[test]
fn test_creates_missing_output_directories() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("deeper").join("out.ppm");

    clean_file(&fixture("3x3-test.ppm"), &output, &CleanConfig::default()).unwrap();
    assert!(output.is_file());
}

#[test]
fn test_unsupported_extensions() {
    let dir = TempDir::new().unwrap();

    let err = clean_file(&fixture("3x3-test.ppm"), &dir.path().join("out.bmp"), &CleanConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));

    let input = dir.path().join("page.tiff");
    fs::write(&input, b"not an image").unwrap();
    let err = clean_file(&input, &dir.path().join("out.ppm"), &CleanConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(p) if p == input));
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = clean_file(
        &dir.path().join("absent.ppm"),
        &dir.path().join("out.ppm"),
        &CleanConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!dir.path().join("out.ppm").exists());
}

#[test]
fn test_malformed_ppm_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.ppm");

    let empty = dir.path().join("empty.ppm");
    fs::write(&empty, b"").unwrap();
    let err = clean_file(&empty, &output, &CleanConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Ppm(PpmError::BadMagic)));

    let truncated = dir.path().join("truncated.ppm");
    fs::write(&truncated, b"P3\n2 2\n255\n0 0 0 255 255 255\n").unwrap();
    let err = clean_file(&truncated, &output, &CleanConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Ppm(PpmError::Truncated {
            expected: 12,
            found: 6
        })
    ));
    assert!(!output.exists());
}

#[test]
fn test_corrupt_png_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.png");
    fs::write(&input, b"\x89PNG\r\n\x1a\nnope").unwrap();

    let err = clean_file(&input, &dir.path().join("out.png"), &CleanConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Image(_)));
}

#[test]
fn test_deep_ppm_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("deep.ppm");
    let output = dir.path().join("deep-clean.ppm");
    fs::write(&input, b"P3\n2 1\n1023\n1023 1023 1023  0 0 0\n").unwrap();

    clean_file(&input, &output, &CleanConfig::default()).unwrap();
    let cleaned = ppm::read_ppm(&output).unwrap();
    assert_eq!(cleaned.maxval(), 255);
    assert!(cleaned.as_samples().iter().all(|&v| v == 0 || v == 255));
}
