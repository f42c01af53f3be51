#![cfg(unix)]

use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const CAPTIONS: &str = "\
X-TIMESTAMP-MAP=MPEGTS:900000,LOCAL:00:00:00.000
00:02:00.000 --> 00:02:01.000

X-TIMESTAMP-MAP=MPEGTS:900000,LOCAL:00:00:00.000
00:07:00.000 --> 00:07:01.000
";

const FAKE_FFPROBE: &str = r#"#!/bin/sh
echo '{ "format": { "duration": "600.000000" } }'
"#;

// Copies the second input (the chapter metadata) to the output path.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
inputs=0
prev=""
for arg in "$@"; do
    if [ "$prev" = "-i" ]; then
        inputs=$((inputs + 1))
        if [ "$inputs" -eq 2 ]; then metadata="$arg"; fi
    fi
    prev="$arg"
    out="$arg"
done
cp "$metadata" "$out"
"#;

struct FakeTools {
    _dir: TempDir,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fake_tools() -> FakeTools {
    let dir = TempDir::new().unwrap();
    let ffmpeg = script(dir.path(), "ffmpeg", FAKE_FFMPEG);
    let ffprobe = script(dir.path(), "ffprobe", FAKE_FFPROBE);
    FakeTools {
        _dir: dir,
        ffmpeg,
        ffprobe,
    }
}

fn recording(dir: &Path, name: &str, captions: &str) -> PathBuf {
    let video = dir.join(format!("{name}.mp4"));
    fs::write(&video, b"original video").unwrap();
    fs::write(dir.join(format!("{name}.srt")), captions).unwrap();
    video
}

fn run(ffmpeg: &Path, ffprobe: &Path, args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commercial-chapters"))
        .args(args)
        .env("FFMPEG", ffmpeg)
        .env("FFPROBE", ffprobe)
        .output()
        .unwrap()
}

#[test]
fn tags_a_single_video_and_exits_zero() {
    let tools = fake_tools();
    let dir = TempDir::new().unwrap();
    let video = recording(dir.path(), "show", CAPTIONS);

    let output = run(&tools.ffmpeg, &tools.ffprobe, &[video.as_os_str()]);

    assert_eq!(output.status.code(), Some(0));
    let written = fs::read_to_string(&video).unwrap();
    assert!(written.contains("START=420000\nEND=600000\ntitle=Chapter 3"));
}

#[test]
fn missing_tool_exits_two_before_touching_files() {
    let tools = fake_tools();
    let dir = TempDir::new().unwrap();
    let video = recording(dir.path(), "show", CAPTIONS);

    let output = run(Path::new("/nonexistent/ffmpeg"), &tools.ffprobe, &[video.as_os_str()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ffmpeg must be installed"));
    assert_eq!(fs::read(&video).unwrap(), b"original video");
    assert!(!dir.path().join("show_METADATA.txt").exists());
}

#[test]
fn recursive_on_a_plain_file_exits_two() {
    let tools = fake_tools();
    let dir = TempDir::new().unwrap();
    let video = recording(dir.path(), "show", CAPTIONS);

    let output = run(&tools.ffmpeg, &tools.ffprobe, &[OsStr::new("-r"), video.as_os_str()]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(fs::read(&video).unwrap(), b"original video");
}

#[test]
fn missing_path_argument_exits_two() {
    let tools = fake_tools();

    let output = run(&tools.ffmpeg, &tools.ffprobe, &[]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn batch_with_a_failed_file_exits_one() {
    let tools = fake_tools();
    let dir = TempDir::new().unwrap();
    let good = recording(dir.path(), "a_good", CAPTIONS);
    let bad = recording(dir.path(), "b_bad", "X-TIMESTAMP-MAP=MPEGTS\nsoon --> later\n");

    let output = run(&tools.ffmpeg, &tools.ffprobe, &[OsStr::new("-r"), dir.path().as_os_str()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(fs::read_to_string(&good).unwrap().starts_with(";FFMETADATA1"));
    assert_eq!(fs::read(&bad).unwrap(), b"original video");
}
