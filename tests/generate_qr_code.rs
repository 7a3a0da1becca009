mod common;

use common::capture_logs;
use qrstamp::qr::MAX_MODULE_SIZE;
use qrstamp::{
    Error, QrColor, QrColors, QrDecoder, QrEncoder, ValidatedUrl, generate_qr_code, save_qr_code,
};
use std::fs;

fn url(text: &str) -> ValidatedUrl {
    ValidatedUrl::parse(text).expect("valid url")
}

#[test]
fn saves_non_empty_image_and_logs_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_qr.png");

    let target = url("https://github.com/test");
    let (result, logs) = capture_logs(|| generate_qr_code(&target, &path, None));

    let saved = result.expect("saved");
    assert!(path.exists());
    assert!(fs::metadata(&path).unwrap().len() > 0);
    assert_eq!(saved.path, path);
    assert!(logs.contains("QR code successfully saved"), "logs: {logs}");
}

#[test]
fn written_image_decodes_to_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.png");

    generate_qr_code(&url("https://github.com/kaw393939"), &path, None).unwrap();

    let decoded = QrDecoder::new().decode_file(&path).unwrap();
    assert_eq!(decoded, "https://github.com/kaw393939");
}

#[test]
fn honours_custom_colors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colored_qr.png");
    let colors = QrColors::new("blue".parse().unwrap(), "yellow".parse().unwrap());

    generate_qr_code(&url("https://example.com"), &path, Some(colors)).unwrap();

    let image = image::open(&path).unwrap().to_rgb8();
    assert_eq!(image.get_pixel(0, 0).0, QrColor::rgb(255, 255, 0).channels());
    assert!(image.pixels().any(|p| p.0 == QrColor::rgb(0, 0, 255).channels()));
}

#[test]
fn invalid_url_cannot_reach_the_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("should_not_exist.png");

    let (parsed, _) = capture_logs(|| ValidatedUrl::parse("not_a_valid_url"));

    assert!(matches!(parsed, Err(Error::InvalidUrl(_))));
    assert!(!path.exists());
}

#[test]
fn save_failure_is_logged_and_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("test_qr.png");

    let target = url("https://github.com/test");
    let (result, logs) = capture_logs(|| generate_qr_code(&target, &path, None));

    assert!(result.is_err());
    assert!(!path.exists());
    assert!(logs.contains("An error occurred"), "logs: {logs}");
    assert!(!logs.contains("QR code successfully saved"));
}

#[test]
fn encode_failure_is_logged_and_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("too_long.png");
    let long = url(&format!("https://example.com/{}", "x".repeat(8000)));

    let (result, logs) = capture_logs(|| generate_qr_code(&long, &path, None));

    assert!(matches!(result, Err(Error::QrEncode(_))));
    assert!(!path.exists());
    assert!(logs.contains("An error occurred"), "logs: {logs}");
}

#[test]
fn oversized_module_size_is_logged_and_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.png");
    let encoder = QrEncoder::new().with_module_size(u32::MAX);
    let long = url(&format!("https://example.com/{}", "a".repeat(2000)));

    let (result, logs) = capture_logs(|| save_qr_code(&encoder, &long, &path));

    assert!(matches!(result, Err(Error::QrEncode(_))));
    assert!(!path.exists());
    assert!(logs.contains("An error occurred"), "logs: {logs}");
}

#[test]
fn module_size_beyond_cap_still_renders_short_urls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capped.png");
    let encoder = QrEncoder::new().with_module_size(u32::MAX);

    let saved = save_qr_code(&encoder, &url("https://example.com"), &path).unwrap();

    assert_eq!(saved.width % MAX_MODULE_SIZE, 0);
    assert_eq!(saved.width, saved.height);
}
