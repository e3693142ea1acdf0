//! Usage banner task.

use std::io::Write;

use anyhow::Result;

use crate::tasks;

/// Print the static usage banner.
pub fn run(out: &mut impl Write) -> Result<()> {
    out.write_all(tasks::banner().as_bytes())?;
    out.flush()?;
    Ok(())
}
