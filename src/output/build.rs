use crate::{
    output::DynLazy,
    site::Site,
    util::{progress_bar, recursively_remove_empty_dirs_of_contents},
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{
    collections::HashMap,
    fs, io,
    path::{Component, Path},
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};
use tracing::{debug, info};
use wax::Glob;

/// Writes every output file, skipping unchanged ones, and removes the rest.
pub fn build(
    start: Instant,
    site: &Site,
    output: &HashMap<String, DynLazy<'_, Vec<u8>>>,
) -> io::Result<()> {
    fs::create_dir_all(&site.config.output)?;

    let mut removals = 0usize;
    let glob = Glob::new("**").map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    for file in glob.walk(&site.config.output) {
        let file = file.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        if !file.file_type().is_file() {
            continue;
        }
        let path = format!("/{}", file.matched().complete());
        if !output.contains_key(&path) {
            debug!("removing obsolete {path}");
            fs::remove_file(file.path())?;
            removals += 1;
        }
    }
    recursively_remove_empty_dirs_of_contents(&site.config.output)?;

    let progress = progress_bar("Saving website...", output.len(), start);
    let reused = AtomicUsize::new(0);

    output
        .par_iter()
        .try_for_each(|(path, generator)| -> io::Result<()> {
            let relative = path.strip_prefix('/').unwrap_or(path);
            if !Path::new(relative)
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
            {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{path} is outside the output directory"),
                ));
            }
            let path = site.config.subdirectory(relative);
            let contents = &**generator;

            if fs::read(&path).is_ok_and(|existing| existing == *contents) {
                reused.fetch_add(1, Ordering::Relaxed);
            } else {
                if let Some((dir, _)) = path.rsplit_once('/') {
                    fs::create_dir_all(dir)?;
                }
                fs::write(&path, contents)?;
            }

            progress.inc(1);
            Ok(())
        })?;

    progress.finish_and_clear();

    info!(
        "({:.1}s) Saved website to {}, reusing {}/{} files, removed {removals} obsolete files",
        start.elapsed().as_secs_f32(),
        site.config.output,
        reused.load(Ordering::Relaxed),
        output.len(),
    );
    Ok(())
}
