//! End-to-end runs through a real child process. A small shell script
//! stands in for ffmpeg and records the arguments it was called with.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use video_compress::{compress_all, Config};

/// Shrinks the input to its first 10 bytes unless told otherwise by the file name
const SHRINKING_ENCODER: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/calls.txt"
for last; do :; done
case "$(basename "$2")" in
  *broken*) echo "simulated failure" >&2; exit 1 ;;
  *grow*) cat "$2" "$2" > "$last" ;;
  *) head -c 10 "$2" > "$last" ;;
esac
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("bin").join("fake-ffmpeg");
        std::fs::create_dir_all(script.parent().unwrap()).unwrap();
        std::fs::write(&script, SHRINKING_ENCODER).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        Self { dir }
    }

    fn videos(&self) -> PathBuf {
        self.dir.path().join("videos")
    }

    fn add(&self, name: &str, size: usize) -> PathBuf {
        let path = self.videos().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, vec![b'v'; size]).unwrap();
        path
    }

    fn config(&self, delete_after_success: bool) -> Config {
        Config {
            max_threads: 2,
            delete_after_success,
            encoder: self.dir.path().join("bin").join("fake-ffmpeg"),
            log_path: self.dir.path().join("encode.log"),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("bin").join("calls.txt"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("encode.log")).unwrap_or_default()
    }
}

fn size_of(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len()
}

#[tokio::test]
async fn test_movie_scenario_with_default_crf() {
    let fixture = Fixture::new();
    let movie = fixture.add("movie.mkv", 100);

    let stats = compress_all(fixture.config(false), &[movie.clone()]).await.unwrap();

    assert_eq!((stats.success, stats.failure, stats.skip), (1, 0, 0));
    let output = fixture.videos().join("movie-compressed.mp4");
    assert_eq!(size_of(&output), 10);
    assert!(movie.exists());
    assert!(!fixture.videos().join("movie.mkv-compressed.part.mp4").exists());

    let calls = fixture.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("-n -c:v libx264 -tag:v avc1 -movflags faststart -crf 30 -preset superfast"));
    assert!(calls[0].ends_with("movie.mkv-compressed.part.mp4"));
    assert!(fixture.log().contains("Running: "));
}

#[tokio::test]
async fn test_notes_are_skipped_without_encoder() {
    let fixture = Fixture::new();
    let notes = fixture.add("notes.txt", 100);

    let stats = compress_all(fixture.config(false), &[notes]).await.unwrap();

    assert_eq!((stats.success, stats.failure, stats.skip), (0, 0, 1));
    assert!(fixture.calls().is_empty());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let fixture = Fixture::new();
    fixture.add("a.mkv", 100);
    fixture.add("season/b.mp4", 100);
    fixture.add("season/extras/c.mov", 100);

    let first = compress_all(fixture.config(false), &[fixture.videos()]).await.unwrap();
    assert_eq!((first.success, first.failure, first.skip), (3, 0, 0));

    let second = compress_all(fixture.config(false), &[fixture.videos()]).await.unwrap();
    assert_eq!(second.success, 0);
    assert_eq!(second.failure, 0);
    assert_eq!(second.skip, 6);
    assert_eq!(fixture.calls().len(), 3);
}

#[tokio::test]
async fn test_degenerate_compression_keeps_original() {
    let fixture = Fixture::new();
    let input = fixture.add("grow.mkv", 100);

    let stats = compress_all(fixture.config(true), &[input.clone()]).await.unwrap();

    assert_eq!(stats.success, 0);
    assert_eq!(stats.failure, 0);
    assert_eq!(stats.total(), 1);
    assert!(!input.exists());
    let output = fixture.videos().join("grow-compressed.mp4");
    assert_eq!(std::fs::read(output).unwrap(), vec![b'v'; 100]);
}

#[tokio::test]
async fn test_mixed_tree_with_delete() {
    let fixture = Fixture::new();
    let good = fixture.add("good.avi", 100);
    let broken = fixture.add("nested/broken.mkv", 100);
    fixture.add("nested/cover.jpg", 100);

    let stats = compress_all(fixture.config(true), &[fixture.videos()]).await.unwrap();

    assert_eq!((stats.success, stats.failure, stats.skip), (1, 1, 1));
    assert!(!good.exists());
    assert!(fixture.videos().join("good-compressed.mp4").exists());
    assert!(broken.exists());
    assert!(!fixture.videos().join("nested/broken-compressed.mp4").exists());
    assert!(fixture.log().contains("simulated failure"));
}
