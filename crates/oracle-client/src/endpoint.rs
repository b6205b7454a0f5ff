use reqwest::Url;

/// Join `relative` under `base`, keeping any path prefix the base carries.
///
/// `Url::join` replaces the last segment of a base without a trailing slash,
/// so one is added first.
pub(crate) fn join_under(base: &str, relative: &str) -> Result<Url, String> {
    let mut base_url = Url::parse(base).map_err(|e| format!("{base}: {e}"))?;
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url.join(relative).map_err(|e| e.to_string())
}
