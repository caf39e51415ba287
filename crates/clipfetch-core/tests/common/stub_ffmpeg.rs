//! Shell scripts standing in for the ffmpeg binary.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Copies stdin to the last argument (the destination), like a lossless remux would.
pub const COPY_TO_DEST: &str = "#!/bin/sh\nfor last; do :; done\ncat > \"$last\"\n";

/// Like `COPY_TO_DEST` but renames into place, so concurrent writers never interleave.
pub const COPY_ATOMIC: &str =
    "#!/bin/sh\nfor last; do :; done\ncat > \"$last.$$\" && mv \"$last.$$\" \"$last\"\n";

/// Records its arguments next to the destination, then copies stdin.
pub const RECORD_ARGS: &str =
    "#!/bin/sh\nfor last; do :; done\necho \"$@\" > \"$last.args\"\ncat > \"$last\"\n";

/// Drains stdin and fails.
pub const FAIL: &str = "#!/bin/sh\ncat > /dev/null\nexit 3\n";

/// Writes `script` as an executable file named `name` in `dir`.
pub fn install(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).expect("write stub");
    let mut perms = fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}
