// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Context, Result};
use std::{
    io::{Write, stdout},
    path::Path,
};
use tempfile::NamedTempFile;

mod format;

pub use format::OutputFormat;

/// Write already-rendered content to `output`, or to stdout when there is none.
///
/// A file is written next to its destination and moved into place only once complete, so a
/// failure never leaves a partial document behind.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(output) => {
            let directory = output
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let mut file = NamedTempFile::new_in(directory)
                .with_context(|| format!("Failed to create `{}`", output.display()))?;

            write_content(&mut file, content)
                .with_context(|| format!("Failed to write `{}`", output.display()))?;
            file.persist(output)
                .with_context(|| format!("Failed to create `{}`", output.display()))?;
            Ok(())
        }
        None => write_content(&mut stdout().lock(), content),
    }
}

fn write_content(writer: &mut impl Write, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
