use crate::form::{FormField, FormState};
use crate::render::format_workout_entry;
use crate::session::{Event, MapProvider, Notifier, Session};
use crate::types::{Coords, WorkoutKind};
use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};

static LINE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(?P<cmd>[a-z]+)(?:\s+(?P<rest>.*?))?\s*$").ok());

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(Coords),
    SetType(String),
    Set(FormField, String),
    Submit,
    List,
}

/// Parses one script line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let caps = LINE_RE
        .as_ref()
        .context("script line pattern failed to compile")?
        .captures(line)
        .with_context(|| format!("unrecognized line: {line:?}"))?;
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    let cmd = match &caps["cmd"] {
        "click" => {
            let mut it = rest.split_whitespace();
            let (Some(lat), Some(lng), None) = (it.next(), it.next(), it.next()) else {
                bail!("click expects <lat> <lng>, got {rest:?}");
            };
            let lat: f64 = lat.parse().with_context(|| format!("click latitude {lat:?}"))?;
            let lng: f64 = lng.parse().with_context(|| format!("click longitude {lng:?}"))?;
            Command::Click(Coords::new(lat, lng))
        }
        "type" => Command::SetType(rest.to_string()),
        "distance" => Command::Set(FormField::Distance, rest.to_string()),
        "duration" => Command::Set(FormField::Duration, rest.to_string()),
        "cadence" => Command::Set(FormField::Cadence, rest.to_string()),
        "elevation" => Command::Set(FormField::Elevation, rest.to_string()),
        "submit" if rest.is_empty() => Command::Submit,
        "list" if rest.is_empty() => Command::List,
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(cmd))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    pub lines: usize,
    pub skipped: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Apply one command to the session, writing any listing to `out`.
pub fn apply<M, N, W>(
    session: &mut Session<M, FormState, N>,
    cmd: Command,
    out: &mut W,
    stats: &mut ScriptStats,
) -> Result<()>
where
    M: MapProvider,
    N: Notifier,
    W: Write,
{
    match cmd {
        Command::Click(at) => session.on_map_click(at),
        Command::SetType(value) => {
            let Some(kind) = WorkoutKind::from_selector(&value) else {
                stats.skipped += 1;
                tracing::warn!(value = %value, "skipping unknown workout type");
                return Ok(());
            };
            let current = WorkoutKind::from_selector(&session.form().fields.kind);
            session.form_mut().set(FormField::Type, kind.as_str());
            if current != Some(kind) {
                session.on_type_change();
            }
        }
        Command::Set(field, value) => session.form_mut().set(field, &value),
        Command::Submit => match session.handle(Event::FormSubmitted) {
            Ok(()) => stats.accepted += 1,
            Err(_) => stats.rejected += 1,
        },
        Command::List => {
            for (i, w) in session.workouts().iter().enumerate() {
                writeln!(out, "{}\t{}", i + 1, format_workout_entry(w))?;
            }
        }
    }
    Ok(())
}

/// Run a whole script against the session.
///
/// Malformed lines are logged and skipped; rejected submissions have already
/// been reported through the session's notifier.
pub fn run<M, N, R, W>(
    session: &mut Session<M, FormState, N>,
    input: R,
    out: &mut W,
) -> Result<ScriptStats>
where
    M: MapProvider,
    N: Notifier,
    R: BufRead,
    W: Write,
{
    let mut stats = ScriptStats::default();

    for (i, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("reading script line {}", i + 1))?;
        stats.lines += 1;

        match parse_line(&line) {
            Ok(Some(cmd)) => apply(session, cmd, out, &mut stats)?,
            Ok(None) => {}
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!(line = i + 1, err = %e, "skipping script line");
            }
        }
    }

    tracing::info!(
        lines = stats.lines,
        accepted = stats.accepted,
        rejected = stats.rejected,
        skipped = stats.skipped,
        "script finished"
    );
    Ok(stats)
}
