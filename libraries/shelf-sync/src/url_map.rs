use std::path::{Component, Path, PathBuf};

/// Maps local file paths to public URLs
///
/// Each root is paired with a URL prefix. The first root that contains the
/// path wins; the remaining path segments are percent-encoded one by one.
#[derive(Debug, Clone, Default)]
pub struct UrlMapper {
    roots: Vec<(PathBuf, String)>,
}

impl UrlMapper {
    pub fn new<P, U>(roots: impl IntoIterator<Item = (P, U)>) -> Self
    where
        P: Into<PathBuf>,
        U: Into<String>,
    {
        Self {
            roots: roots
                .into_iter()
                .map(|(root, prefix)| (root.into(), prefix.into()))
                .collect(),
        }
    }

    /// Public URL for `path`, if any configured root contains it
    pub fn map(&self, path: &Path) -> Option<String> {
        self.roots.iter().find_map(|(root, prefix)| {
            let rest = path.strip_prefix(root).ok()?;

            let mut url = prefix.trim_end_matches('/').to_string();
            for component in rest.components() {
                if let Component::Normal(segment) = component {
                    url.push('/');
                    url.push_str(&urlencoding::encode(&segment.to_string_lossy()));
                }
            }
            Some(url)
        })
    }
}
