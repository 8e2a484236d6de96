use dirmatch_types::DirectoryRequirement;
use serde::Serialize;

/// Number of file and subdirectory requirements a schema subtree declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpectedSize {
    pub files: usize,
    pub subdirs: usize,
}

impl ExpectedSize {
    /// `3 files and 1 subdirectory`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} and {} {}",
            self.files,
            if self.files == 1 { "file" } else { "files" },
            self.subdirs,
            if self.subdirs == 1 {
                "subdirectory"
            } else {
                "subdirectories"
            }
        )
    }
}

/// Counts the requirements declared under `requirement`, descending into nested directory
/// requirements when `recursive` is set. Works on the schema alone; the filesystem is never
/// touched.
pub fn count_expected(requirement: &DirectoryRequirement, recursive: bool) -> ExpectedSize {
    let mut size = ExpectedSize {
        files: requirement.files().len(),
        subdirs: 0,
    };

    for nested in requirement.subdirs().values() {
        size.subdirs += 1;
        if recursive {
            let inner = count_expected(nested, true);
            size.files += inner.files;
            size.subdirs += inner.subdirs;
        }
    }

    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirmatch_types::FileRequirement;

    fn two_files_one_subdir() -> DirectoryRequirement {
        let inner = DirectoryRequirement::builder()
            .file("readme", FileRequirement::any(["md"]).unwrap())
            .build()
            .unwrap();
        DirectoryRequirement::builder()
            .file("a", FileRequirement::all(["txt"]).unwrap())
            .file("b", FileRequirement::all(["txt"]).unwrap())
            .subdir("inner", inner)
            .build()
            .unwrap()
    }

    #[test]
    fn non_recursive_counts_immediate_children() {
        let size = count_expected(&two_files_one_subdir(), false);
        assert_eq!(
            size,
            ExpectedSize {
                files: 2,
                subdirs: 1
            }
        );
    }

    #[test]
    fn recursive_sums_nested_requirements() {
        let size = count_expected(&two_files_one_subdir(), true);
        assert_eq!(
            size,
            ExpectedSize {
                files: 3,
                subdirs: 1
            }
        );
    }

    #[test]
    fn recursive_counts_every_nested_level() {
        let leaf = DirectoryRequirement::builder()
            .file("x", FileRequirement::all(["bin"]).unwrap())
            .build()
            .unwrap();
        let mid = DirectoryRequirement::builder()
            .subdir("leaf", leaf)
            .build()
            .unwrap();
        let root = DirectoryRequirement::builder()
            .subdir("mid", mid)
            .subdir("other", DirectoryRequirement::empty())
            .build()
            .unwrap();

        assert_eq!(
            count_expected(&root, true),
            ExpectedSize {
                files: 1,
                subdirs: 3
            }
        );
        assert_eq!(
            count_expected(&root, false),
            ExpectedSize {
                files: 0,
                subdirs: 2
            }
        );
    }

    #[test]
    fn describe_pluralizes() {
        let one = ExpectedSize {
            files: 1,
            subdirs: 1,
        };
        let many = ExpectedSize {
            files: 0,
            subdirs: 2,
        };
        assert_eq!(one.describe(), "1 file and 1 subdirectory");
        assert_eq!(many.describe(), "0 files and 2 subdirectories");
    }
}
