use std::path::PathBuf;

use clap::Parser;

use crate::app::Destination;

#[derive(Parser, Debug)]
#[command(name = "findit", version, about = "Campus lost & found in the terminal")]
pub struct Args {
    /// Item file to read and write (overrides `data.path` in the config)
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Open the browse screen filtered by this query
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Open the browse screen with this item id selected
    #[arg(long, value_name = "ID")]
    pub highlight: Option<String>,

    /// Fill an empty item file with sample reports before starting
    #[arg(long)]
    pub seed: bool,
}

impl Args {
    /// Screen to open on startup.
    pub fn destination(&self) -> Destination {
        if self.search.is_none() && self.highlight.is_none() {
            return Destination::Home;
        }
        Destination::Browse {
            search: self.search.clone(),
            highlight: self.highlight.clone(),
        }
    }
}
