//! # Utility Functions Module
//!
//! Helpers for building and printing external command lines.

use std::ffi::{OsStr, OsString};

/// Builds an argument vector from items of mixed types.
///
/// Each item only needs `AsRef<OsStr>`, so `&str`, `&String` and `&Path`
/// can be combined freely.
///
/// # Example
/// ```rust
/// use video_compress::os_args;
/// use std::path::Path;
///
/// let crf = 30.to_string();
/// let args = os_args!["-i", Path::new("in.mkv"), "-crf", &crf];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! os_args {
    [$($item:expr),* $(,)?] => {
        vec![$(::std::ffi::OsString::from($item)),*]
    };
}

/// Renders a program and its arguments as a single shell-like line.
///
/// Arguments containing whitespace or quotes are single-quoted; the result
/// is meant for logs, not for re-execution.
pub fn render_command(program: &OsStr, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    if arg.is_empty() {
        return "''".to_string();
    }
    if arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_os_args_macro_mixed_types() {
        let crf = 30;
        let result = os_args!["-i", Path::new("dir/in.mkv"), "-crf", &crf.to_string()];
        assert_eq!(
            result,
            vec![
                OsString::from("-i"),
                OsString::from("dir/in.mkv"),
                OsString::from("-crf"),
                OsString::from("30"),
            ]
        );
    }

    #[test]
    fn test_render_command_quotes_spaces() {
        let args = os_args!["-i", "my movie.mkv", "-n", "it's.mp4"];
        assert_eq!(
            render_command(OsStr::new("ffmpeg"), &args),
            r"ffmpeg -i 'my movie.mkv' -n 'it'\''s.mp4'"
        );
    }

    #[test]
    fn test_render_command_empty_arg() {
        let args = os_args![""];
        assert_eq!(render_command(OsStr::new("x"), &args), "x ''");
    }
}
