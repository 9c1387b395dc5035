//! Pure path transforms used by url rewriting.

/// Resolve `.` and `..` segments. Leading `..` segments with nothing to
/// cancel are kept.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => match segments.last() {
                None | Some(&"..") => segments.push(segment),
                Some(_) => {
                    segments.pop();
                }
            },
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Not absolute, not a fragment, and without a `scheme:` prefix.
pub fn is_path_relative(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('#') {
        return false;
    }
    let scheme_len = path
        .bytes()
        .take_while(|byte| byte.is_ascii_alphabetic() || *byte == b'-')
        .count();
    !(scheme_len > 0 && path.as_bytes().get(scheme_len) == Some(&b':'))
}

pub fn is_path_local_relative(path: &str) -> bool {
    path.starts_with('.')
}
