//! `trix done` — toggle a trick's learned state for a user.

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::engine::error::EngineError;
use crate::engine::session::Session;
use crate::store::FileStore;

pub fn run(category: &str, user: &str, trick: &str) -> Result<()> {
    let mut store = FileStore::open()?;
    let mut session = Session::new(category, user);
    session.load(&store)?;

    if session.graph().node(trick).is_none() {
        bail!("no trick \"{}\" in category {}", trick, category);
    }

    match session.toggle(&mut store, trick) {
        Ok(true) => println!("  {} {}", "Learned".green().bold(), trick),
        Ok(false) => println!("  {} {}", "Unlearned".yellow().bold(), trick),
        Err(err @ EngineError::Persistence { .. }) => {
            println!("  {} {}", "Failed:".red().bold(), err);
            bail!("completion was not saved — retry when the store is reachable");
        }
        Err(err) => return Err(err.into()),
    }

    let remaining = session.incomplete_order().len();
    if remaining == 0 {
        println!("  {}", "Category complete.".green());
    } else {
        println!(
            "  {}",
            format!("{} trick(s) left in this category.", remaining).dark_grey()
        );
    }
    Ok(())
}
