//! Fake extractor script and downloader setup for integration tests

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use media_dl::{Config, MediaDownloader};

/// Shell stand-in for yt-dlp
///
/// Behavior is keyed on the URL:
/// - contains `fail`: error on stderr, exit 1
/// - contains `nofile`: progress output, exit 0, no file written
/// - contains `broken` (metadata mode): non-JSON output
/// - otherwise: progress output, `.part` file renamed to `<template with ext=mp4>`
pub const FAKE_EXTRACTOR: &str = r#"#!/bin/sh
out=""
dump=0
url=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    --dump-single-json) dump=1 ;;
  esac
  url="$1"
  shift
done

if [ "$dump" = 1 ]; then
  case "$url" in
    *broken*) echo "this is not json"; exit 0 ;;
    *fail*) echo "ERROR: Unsupported URL: $url" >&2; exit 1 ;;
  esac
  echo '{"title":"Fixture Clip","extractor_key":"Generic","duration":12.0,"formats":[{"height":1080,"vcodec":"avc1"}]}'
  exit 0
fi

case "$url" in
  *fail*) echo "ERROR: Unsupported URL: $url" >&2; exit 1 ;;
esac

echo "[download] Destination: $out"
echo "[download]   0.0% of 1.00MiB at 1.00MiB/s ETA 00:01"
echo "[download]  50.0% of 1.00MiB at 1.00MiB/s ETA 00:00"
echo "[download] 100.0% of 1.00MiB at 1.00MiB/s ETA 00:00"

case "$url" in
  *nofile*) exit 0 ;;
esac

file=$(printf '%s' "$out" | sed 's/%(ext)s/mp4/')
printf 'media' > "$file.part"
mv "$file.part" "$file"
exit 0
"#;

/// Write the fake extractor into `dir` and return its path
pub fn install_fake_extractor(dir: &Path) -> PathBuf {
    let path = dir.join("fake-yt-dlp");
    std::fs::write(&path, FAKE_EXTRACTOR).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Config rooted in `dir`, pointing at `extractor`
pub fn test_config(dir: &TempDir, extractor: PathBuf) -> Config {
    let mut config = Config::default();
    config.download.download_dir = dir.path().join("downloads");
    config.download.settle_delay = Duration::from_millis(50);
    config.tools.extractor_path = Some(extractor);
    config
}

/// Downloader running the fake extractor through the real process runner
pub async fn create_downloader() -> (MediaDownloader, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let extractor = install_fake_extractor(dir.path());
    let downloader = MediaDownloader::new(test_config(&dir, extractor))
        .await
        .unwrap();
    (downloader, dir)
}
