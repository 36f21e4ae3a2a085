//! Test-only helpers for building tutorial directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Tutorial with valid JavaScript, an unchecked shell block and an invalid
/// snippet, in the style of the tutorial corpus (Markdown stored as `.js`).
pub const VARIABLES_TUTORIAL: &str = r#"In JavaScript, variables are declared with `var`, `let`, and `const`.

### 1. **Declaring Variables**

- `let` is block-scoped and can be updated.

   ```javascript
   let y = 10;
   y = 20; // Allowed, y is updated
   console.log(y); // 20
   ```

- `const` must be initialized.

   ```javascript
   const z = ;
   ```

Run the file with Node:

```bash
node variables.js
```
"#;

/// Tutorial whose snippets all parse or are out of scope.
pub const API_TUTORIAL: &str = r#"# Working with APIs

A typical JSON response:

```json
{ "id": 1, "name": "John Doe", "tags": ["admin"] }
```

Fetch it:

```javascript
fetch('/api/users/1')
  .then((response) => response.json())
  .then((user) => console.log(user.name));
```

The raw request:

```http
GET /api/users/1 HTTP/1.1
Host: example.com
```
"#;

/// Tutorial with an unterminated fence.
pub const BROKEN_TUTORIAL: &str = "Intro to loops.\n\n```javascript\nfor (let i = 0; i < 3; i++) {\n";

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, contents).expect("write test file");
    path
}

/// Temporary input directory populated with tutorial files.
pub struct TutorialDir {
    dir: TempDir,
}

impl TutorialDir {
    pub fn new(files: &[(&str, &str)]) -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        for (relative, contents) in files {
            let path = dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        }
        Ok(Self { dir })
    }

    /// `variables.js` (one invalid snippet), `basics/api.md` (all fine).
    pub fn with_samples() -> Result<Self> {
        Self::new(&[
            ("variables.js", VARIABLES_TUTORIAL),
            ("basics/api.md", API_TUTORIAL),
        ])
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
