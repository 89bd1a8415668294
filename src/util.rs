use indicatif::{ProgressBar, ProgressStyle};
use std::{fs, io, path::Path, time::Instant};

pub fn recursively_remove_empty_dirs_of_contents<P: AsRef<Path>>(path: P) -> io::Result<()> {
    fn recursively_remove_empty_dirs<P: AsRef<Path>>(path: P) -> io::Result<bool> {
        let mut keep = false;
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_dir() {
                keep |= recursively_remove_empty_dirs(path)?;
            } else {
                keep = true;
            }
        }
        if !keep {
            fs::remove_dir(&path)?;
        }
        Ok(keep)
    }

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            recursively_remove_empty_dirs(path)?;
        }
    }
    Ok(())
}

pub fn progress_bar(name: &str, count: usize, start: Instant) -> ProgressBar {
    ProgressBar::new(count as u64)
        .with_message(name.to_owned())
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg} {wide_bar} {pos}/{len} {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        )
        .with_elapsed(start.elapsed())
}
