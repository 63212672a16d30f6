use crate::ports::extractor::{ExtractOptions, ExtractProfile};
use std::path::Path;

/// Leading token of the progress lines we ask yt-dlp to print.
pub const PROGRESS_MARKER: &str = "mediafetch";

fn progress_template() -> String {
    format!(
        "download:{}|%(progress.status)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s",
        PROGRESS_MARKER
    )
}

fn common_args(opts: &ExtractOptions, ffmpeg_location: Option<&Path>) -> Vec<String> {
    let mut args = vec!["--no-colors".to_string()];
    if opts.single_item {
        args.push("--no-playlist".to_string());
    }
    if let Some(location) = ffmpeg_location {
        args.push("--ffmpeg-location".to_string());
        args.push(location.to_string_lossy().into_owned());
    }
    args
}

pub fn build_metadata_args(
    url: &str,
    opts: &ExtractOptions,
    ffmpeg_location: Option<&Path>,
) -> Vec<String> {
    let mut args = common_args(opts, ffmpeg_location);
    args.extend(["--dump-single-json", "--skip-download"].map(String::from));
    args.push("--".to_string());
    args.push(url.to_string());
    args
}

pub fn build_download_args(
    url: &str,
    opts: &ExtractOptions,
    ffmpeg_location: Option<&Path>,
) -> Vec<String> {
    let mut args = common_args(opts, ffmpeg_location);
    args.extend(["--newline", "--progress-template"].map(String::from));
    args.push(progress_template());
    args.push("-f".to_string());
    args.push(opts.profile.format_selector().to_string());
    args.push("-o".to_string());
    args.push(opts.output_path_template().to_string_lossy().into_owned());

    if let ExtractProfile::AudioMp3 { bitrate_kbps } = &opts.profile {
        args.push("--extract-audio".to_string());
        args.push("--audio-format".to_string());
        args.push(opts.profile.output_extension().unwrap_or("mp3").to_string());
        args.push("--audio-quality".to_string());
        args.push(format!("{}K", bitrate_kbps));
    }

    args.push("--".to_string());
    args.push(url.to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::jobs::{JobId, MediaKind};
    use std::path::PathBuf;

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_video_download_args() {
        let id = JobId::new();
        let opts = ExtractOptions::for_job(Path::new("/srv/dl"), &id, MediaKind::Video);
        let args = build_download_args("https://valid.example/video1", &opts, None);

        assert_eq!(value_after(&args, "-f"), Some("best"));
        assert_eq!(
            value_after(&args, "-o").map(PathBuf::from),
            Some(PathBuf::from(format!("/srv/dl/{}_%(title)s.%(ext)s", id)))
        );
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--newline".to_string()));
        assert!(!args.contains(&"--extract-audio".to_string()));
        assert_eq!(args.last().unwrap(), "https://valid.example/video1");
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn test_audio_download_args() {
        let opts = ExtractOptions::for_job(Path::new("/srv/dl"), &JobId::new(), MediaKind::Audio);
        let args = build_download_args(
            "https://valid.example/song",
            &opts,
            Some(Path::new("/opt/ffmpeg/bin")),
        );

        assert_eq!(value_after(&args, "-f"), Some("bestaudio/best"));
        assert!(args.contains(&"--extract-audio".to_string()));
        assert_eq!(value_after(&args, "--audio-format"), Some("mp3"));
        assert_eq!(value_after(&args, "--audio-quality"), Some("192K"));
        assert_eq!(value_after(&args, "--ffmpeg-location"), Some("/opt/ffmpeg/bin"));
        assert!(value_after(&args, "--progress-template")
            .unwrap()
            .starts_with("download:mediafetch|"));
    }

    #[test]
    fn test_metadata_args_skip_download() {
        let opts = ExtractOptions::for_job(Path::new("/srv/dl"), &JobId::new(), MediaKind::Video);
        let args = build_metadata_args("https://valid.example/video1", &opts, None);
        assert!(args.contains(&"--dump-single-json".to_string()));
        assert!(args.contains(&"--skip-download".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"-o".to_string()));
    }
}
