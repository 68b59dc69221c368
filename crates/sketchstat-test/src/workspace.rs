// sketchstat - Statistical post-processing for sketch evaluations
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Temporary directories holding fixture tables.

use crate::fixtures::builders::TableBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory that is removed when dropped.
///
/// # Examples
///
/// ```
/// use sketchstat_test::{fixtures, Workspace};
///
/// let ws = Workspace::new();
/// let path = ws.write("raw/1/skew-0.9.csv", &fixtures::three_point_err([0.1, 0.2, 0.3]));
/// assert!(path.exists());
/// assert_eq!(ws.read("raw/1/skew-0.9.csv"), "x,err\n1,0.1\n2,0.2\n3,0.3\n");
/// ```
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Creates an empty workspace.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temporary workspace"),
        }
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes a table to `relative`, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, table: &TableBuilder) -> PathBuf {
        table.write(self.join(relative))
    }

    /// Writes raw text to `relative`, creating parent directories.
    pub fn write_raw(&self, relative: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Reads a file inside the workspace to a string.
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        let path = self.join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
    }

    /// Whether `relative` exists.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.join(relative).exists()
    }

    /// Sorted names of the entries in directory `relative`.
    pub fn list(&self, relative: impl AsRef<Path>) -> Vec<String> {
        let path = self.join(relative);
        let mut names: Vec<String> = fs::read_dir(&path)
            .unwrap_or_else(|e| panic!("list {}: {}", path.display(), e))
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
