//! Run configuration assembled from CLI options.

use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use crate::page::PageConfig;
use crate::runtime::Runtime;

/// Everything a command needs to know about the site being rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory relative feed paths are resolved against
    pub site_root: PathBuf,
    /// Page configuration; `None` renders nothing release-related
    pub page: Option<PageConfig>,
}

impl Config {
    /// Build the configuration.
    ///
    /// The site root is, in order: `site_root` (which must be a directory),
    /// the directory containing `template`, the current directory. A
    /// `config_path` that was given but cannot be read or parsed is an error.
    pub fn load<R: Runtime + ?Sized>(
        runtime: &R,
        config_path: Option<&Path>,
        site_root: Option<PathBuf>,
        template: Option<&Path>,
    ) -> Result<Self> {
        let site_root = match site_root {
            Some(root) => {
                if !runtime.is_dir(&root) {
                    bail!("Site root {} is not a directory", root.display());
                }
                root
            }
            None => match template.and_then(Path::parent) {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => runtime.current_dir()?,
            },
        };
        debug!("Using site root {:?}", site_root);

        let page = match config_path {
            Some(path) => {
                debug!("Loading page config from {:?}", path);
                Some(PageConfig::load(runtime, path)?)
            }
            None => None,
        };

        Ok(Self { site_root, page })
    }
}
