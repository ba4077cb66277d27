//! Test fixtures for common test scenarios.
//!
//! A miniature of the real project: the core utility library, the test
//! harness, and one application library with its tests.

use std::path::Path;

/// Source tree files (path relative to the workspace root -> content).
pub const SAMPLE_FILES: &[(&str, &str)] = &[
    ("sonLib/sonLib/impl/sonLibList.c", "void stList_construct(void) {}\n"),
    ("sonLib/sonLib/impl/sonLibHash.c", "void stHash_construct(void) {}\n"),
    ("sonLib/sonLib/inc/sonLib.h", "#pragma once\n"),
    ("sonLib/cuTest/CuTest.c", "void CuSuiteNew(void) {}\n"),
    ("sonLib/cuTest/CuTest.h", "#pragma once\n"),
    ("cactus/impl/cactusGraph.c", "#include \"cactus.h\"\n"),
    ("cactus/impl/cactusMisc.c", "#include \"cactus.h\"\n"),
    ("cactus/impl/cactusDeprecated.c", "#error unused\n"),
    ("cactus/inc/cactus.h", "#pragma once\n"),
    ("cactus/tests/allTests.c", "int main(void) { return 0; }\n"),
];

/// Manifest for [`SAMPLE_FILES`]; targets are listed out of build order.
pub fn sample_manifest() -> &'static str {
    r#"
[[target]]
name = "cactus"
kind = "static-lib"
module = "cactus"
sources = ["impl/*.c"]
exclude = ["impl/cactusDeprecated.c"]
headers = ["inc/*.h"]
deps = ["sonlib"]

[[target]]
name = "cactusTests"
kind = "test-program"
module = "cactus"
sources = ["tests/*.c"]
deps = ["cactus", "sonlib", "cutest"]

[[target]]
name = "sonlib"
kind = "static-lib"
module = "sonlib"
sources = ["impl/*.c"]
headers = ["inc/*.h"]
"#
}

/// Write [`SAMPLE_FILES`] below `root`.
pub fn write_sample_tree(root: &Path) {
    for (rel, content) in SAMPLE_FILES {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
    }
}
