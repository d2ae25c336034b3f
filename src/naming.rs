use url::Url;

pub const FALLBACK_FILENAME: &str = "output.png";
pub const FILENAME_SUFFIX: &str = "-output.png";

pub fn derive_filename(raw_url: &str) -> String {
    let Ok(url) = Url::parse(raw_url.trim()) else {
        return FALLBACK_FILENAME.to_string();
    };

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_lowercase();

    let Ok(decoded) = urlencoding::decode(&segment) else {
        return FALLBACK_FILENAME.to_string();
    };

    let stem = sanitize(&decoded);
    if stem.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    format!("{stem}{FILENAME_SUFFIX}")
}

fn sanitize(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for ch in title.chars() {
        let keep = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
        let next = if keep { ch } else { '_' };
        if next == '_' && out.ends_with('_') {
            continue;
        }
        out.push(next);
    }

    out.trim_matches('_').to_string()
}
