/// Paths precached on install: bundler output plus static files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    build: Vec<String>,
    files: Vec<String>,
}

const STATIC_FILES: &[&str] = &["/", "/manifest.json", "/favicon.ico"];

impl AssetManifest {
    pub fn new<B, F>(build: B, files: F) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            build: build.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Manifest baked in at compile time. The bundler passes the build
    /// output as a comma separated `ANIANGLIA_BUILD_ASSETS` list.
    pub fn bundled() -> Self {
        let build = option_env!("ANIANGLIA_BUILD_ASSETS")
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty());
        Self::new(build, STATIC_FILES.iter().copied())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.iter().any(|asset| asset == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.build.iter().chain(self.files.iter()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.build.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_build_and_static_paths() {
        let manifest = AssetManifest::new(["/app.js", "/app_bg.wasm"], ["/favicon.ico"]);
        assert!(manifest.contains("/app.js"));
        assert!(manifest.contains("/favicon.ico"));
        assert!(!manifest.contains("/api/release/1"));
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn bundled_always_has_static_files() {
        let manifest = AssetManifest::bundled();
        assert!(manifest.contains("/"));
        assert!(!manifest.is_empty());
    }
}
