// src/constants.rs

/// Settings file used when `--settings` is not given.
pub const DEFAULT_SETTINGS_PATH: &str = "./settings.json";

/// Profile name selected for a stage when no name is passed on the command line.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Key in the `global` table holding the project's build path template.
pub const BUILD_PATH_KEY: &str = "build_path";

/// Name of the directory (under the workspace root) that contains every cleanable build tree.
pub const BUILD_ROOT_DIRNAME: &str = "build";

/// Sub-directory of the global build path used when a test profile has no usable override.
pub const TESTS_SUBDIR: &str = "tests";

/// Default executable for the configure and build stages.
pub const DEFAULT_CMAKE_EXECUTABLE: &str = "cmake";

/// Default executable for the test stage.
pub const DEFAULT_CTEST_EXECUTABLE: &str = "ctest";

/// Generator value meaning "let the configure tool pick its own generator".
pub const DEFAULT_GENERATOR: &str = "default";

/// Separator between build-tool arguments and native build driver pass-through arguments.
pub const NATIVE_ARGS_SEPARATOR: &str = "--";
