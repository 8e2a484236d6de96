//! Level success is the conjunction of every check at that level and every nested level.
//! Expected-size counts depend on the schema shape alone.

use camino::Utf8Path;
use dirmatch_domain::{MemTreeView, count_expected, match_directory};
use dirmatch_types::{DirectoryRequirement, FileRequirement};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct FileCase {
    any: bool,
    has_a: bool,
    has_b: bool,
}

impl FileCase {
    fn satisfied(&self) -> bool {
        if self.any {
            self.has_a || self.has_b
        } else {
            self.has_a && self.has_b
        }
    }

    /// Under `Any` only the first present candidate is claimed by the requirement.
    fn leaves_stray(&self) -> bool {
        self.any && self.has_a && self.has_b
    }
}

#[derive(Debug, Clone)]
struct DirCase {
    present: bool,
    inner_ok: bool,
}

fn file_case() -> impl Strategy<Value = FileCase> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(any, has_a, has_b)| FileCase {
        any,
        has_a,
        has_b,
    })
}

fn dir_case() -> impl Strategy<Value = DirCase> {
    (any::<bool>(), any::<bool>()).prop_map(|(present, inner_ok)| DirCase { present, inner_ok })
}

fn build(
    files: &[FileCase],
    dirs: &[DirCase],
    strict: bool,
    stray: bool,
) -> (DirectoryRequirement, MemTreeView) {
    let mut builder = DirectoryRequirement::builder().strict(strict);
    let mut view = MemTreeView::new();

    for (i, case) in files.iter().enumerate() {
        let base = format!("f{i}");
        let req = if case.any {
            FileRequirement::any(["a", "b"]).unwrap()
        } else {
            FileRequirement::all(["a", "b"]).unwrap()
        };
        builder = builder.file(&base, req);
        if case.has_a {
            view = view.with_file(format!("{base}.a"));
        }
        if case.has_b {
            view = view.with_file(format!("{base}.b"));
        }
    }

    for (i, case) in dirs.iter().enumerate() {
        let name = format!("d{i}");
        let inner = DirectoryRequirement::builder()
            .file("x", FileRequirement::all(["txt"]).unwrap())
            .build()
            .unwrap();
        builder = builder.subdir(&name, inner);
        if case.present {
            view = view.with_dir(name.as_str());
            if case.inner_ok {
                view = view.with_file(format!("{name}/x.txt"));
            }
        }
    }

    if stray {
        view = view.with_file("stray.bin");
    }

    (builder.build().unwrap(), view)
}

proptest! {
    #[test]
    fn success_is_conjunction_of_children(
        files in prop::collection::vec(file_case(), 0..4),
        dirs in prop::collection::vec(dir_case(), 0..3),
        strict in any::<bool>(),
        stray in any::<bool>(),
    ) {
        let (req, view) = build(&files, &dirs, strict, stray);
        let result = match_directory(&view, &req, Utf8Path::new("")).unwrap();

        let files_ok = files.iter().all(FileCase::satisfied);
        let dirs_ok = dirs.iter().all(|d| d.present && d.inner_ok);
        let extras = strict && (stray || files.iter().any(FileCase::leaves_stray));

        prop_assert_eq!(result.success, files_ok && dirs_ok && !extras);

        for (i, case) in dirs.iter().enumerate() {
            let nested = result.nested_results.get(&format!("d{i}"));
            prop_assert_eq!(nested.is_some(), case.present);
            if let Some(nested) = nested {
                prop_assert_eq!(nested.success, case.inner_ok);
                if !nested.success {
                    prop_assert!(!result.success);
                }
            }
        }

        prop_assert_eq!(result.message.is_empty(), files_ok && dirs.iter().all(|d| d.present) && !extras);
    }
}

fn leaf(files: usize) -> DirectoryRequirement {
    let mut builder = DirectoryRequirement::builder();
    for i in 0..files {
        builder = builder.file(format!("leaf{i}"), FileRequirement::all(["txt"]).unwrap());
    }
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn counts_follow_schema_shape(
        top_files in 0usize..4,
        children in prop::collection::vec((0usize..4, prop::collection::vec(0usize..3, 0..3)), 0..4),
    ) {
        let mut builder = DirectoryRequirement::builder();
        for i in 0..top_files {
            builder = builder.file(format!("top{i}"), FileRequirement::any(["json"]).unwrap());
        }
        let mut nested_files = 0;
        let mut nested_dirs = 0;
        for (c, (files, grandchildren)) in children.iter().enumerate() {
            let mut child = DirectoryRequirement::builder();
            for i in 0..*files {
                child = child.file(format!("mid{i}"), FileRequirement::all(["png"]).unwrap());
            }
            for (g, leaf_files) in grandchildren.iter().enumerate() {
                child = child.subdir(format!("g{g}"), leaf(*leaf_files));
                nested_files += leaf_files;
                nested_dirs += 1;
            }
            builder = builder.subdir(format!("c{c}"), child.build().unwrap());
            nested_files += files;
        }
        let req = builder.build().unwrap();

        let shallow = count_expected(&req, false);
        prop_assert_eq!(shallow.files, top_files);
        prop_assert_eq!(shallow.subdirs, children.len());

        let deep = count_expected(&req, true);
        prop_assert_eq!(deep.files, top_files + nested_files);
        prop_assert_eq!(deep.subdirs, children.len() + nested_dirs);
    }
}
