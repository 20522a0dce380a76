//! `heat-viz roles`: graph role manifest directories.
//!
//! ```bash
//! heat-viz roles chef/prod/roles chef/stage/roles
//! heat-viz roles chef/prod/roles -o site/graphs --exclude ufw --exclude Devex
//! ```
//!
//! Writes `<output>/merged/` plus one directory per tag (`prod`, `stage`).

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use crate::config::Config;
use crate::render::{PageRenderer, copy_viz_js, warn_if_viz_js_missing};
use crate::roles::RoleSet;
use crate::roles::graphset::GraphSet;

/// Render role manifests into a tree of HTML pages.
#[derive(Args, Debug)]
pub struct RolesCommand {
    /// Role directories holding `*.json` manifests
    #[arg(required = true, num_args = 1..)]
    dirs: Vec<PathBuf>,

    /// Output directory [default: graphs]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Node pattern hidden from the simplified pages, case-insensitive.
    /// Repeatable; replaces the default list.
    #[arg(long)]
    exclude: Vec<String>,
}

impl RolesCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let out_dir = self.output.unwrap_or_else(|| config.roles.output_dir.clone());
        let exclude =
            if self.exclude.is_empty() { config.roles.exclude.clone() } else { self.exclude };
        debug!("Excluding {exclude:?} from simplified pages");

        let role_set = RoleSet::load(&self.dirs)?;
        let renderer = PageRenderer::new(&config.render)?;
        let tags = role_set.tag_names();

        let mut pages = 0;
        for (tag, run_lists) in role_set.tags() {
            let other_tags: Vec<&str> = tags.iter().copied().filter(|t| *t != tag).collect();
            let set = GraphSet::build(tag, run_lists, &other_tags, &exclude)?;
            set.write(&renderer, &out_dir)?;
            let tag_dir = out_dir.join(tag);
            match &config.render.viz_js_file {
                Some(viz_js) => copy_viz_js(viz_js, &tag_dir)?,
                None => {
                    warn_if_viz_js_missing(&config.render.viz_js, &tag_dir);
                }
            }
            pages += set.pages().len();
        }

        println!(
            "{} {} roles, {} tags, {} pages -> {}",
            "✓".green(),
            role_set.merged().len(),
            tags.len(),
            pages,
            out_dir.display()
        );
        Ok(())
    }
}
