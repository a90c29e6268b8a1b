#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use workout_map::form::FormState;
use workout_map::render::{TerminalMap, TerminalNotifier};
use workout_map::session::Session;
use workout_map::{cli, script, utils};

#[macro_use]
extern crate workout_map;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let mut session = Session::new(
        cli.session_options(),
        TerminalMap,
        FormState::default(),
        TerminalNotifier,
    );

    session.start(&mut utils::FixedPosition(cli.position))?;

    let mut stdout = io::stdout().lock();
    let stats = if let Some(path) = &cli.script {
        dlog!("mode=script path={}", path.display());
        let file =
            File::open(path).with_context(|| format!("opening script: {}", path.display()))?;
        script::run(&mut session, BufReader::new(file), &mut stdout)?
    } else {
        dlog!("mode=stdin");
        script::run(&mut session, io::stdin().lock(), &mut stdout)?
    };

    dlog!(
        "session done workouts={} rejected={}",
        session.workouts().len(),
        stats.rejected
    );

    if let Some(path) = &cli.export {
        utils::write_export(path, session.workouts())?;
    }

    Ok(())
}
