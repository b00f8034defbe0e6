use std::path::{Path, PathBuf};

/// Cache directories of the deployment, relative to its root.
pub const DEFAULT_ROOTS: [&str; 2] = ["cache", "administrator/cache"];

/// Ordered list of root directories an operation walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    roots: Vec<PathBuf>,
}

impl Targets {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Targets {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The default pair of cache directories, resolved against `base`.
    pub fn defaults(base: &Path) -> Self {
        Self::resolve(base, DEFAULT_ROOTS)
    }

    /// Joins each root onto `base`. Absolute roots are kept as they are.
    pub fn resolve<I, P>(base: &Path, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Targets {
            roots: roots.into_iter().map(|r| base.join(r)).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_order() {
        let targets = Targets::defaults(Path::new("/srv/site"));
        assert_eq!(
            targets.roots(),
            &[
                PathBuf::from("/srv/site/cache"),
                PathBuf::from("/srv/site/administrator/cache"),
            ]
        );
    }

    #[test]
    fn absolute_roots_ignore_base() {
        let targets = Targets::resolve(Path::new("/srv/site"), ["/tmp/other", "tmp"]);
        assert_eq!(
            targets.roots(),
            &[PathBuf::from("/tmp/other"), PathBuf::from("/srv/site/tmp")]
        );
    }
}
