//! Scripted input replay
//!
//! Drives a [`Deck`] directly, with a millisecond counter standing in for the
//! wall clock, so transitions and their commit timers can be inspected
//! without a terminal.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use snapdeck_core::{AppConfig, Deck, InputEvent, JumpOutcome, Transition};

/// One scripted action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Down,
    Up,
    Wheel(f64),
    Touch(f64),
    TouchEnd,
    /// Caller sets the page number (1-based on the command line)
    Goto(usize),
    Wait(u64),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let step = match (name.to_lowercase().as_str(), arg) {
            ("down", None) => Step::Down,
            ("up", None) => Step::Up,
            ("touch-end", None) => Step::TouchEnd,
            ("wheel", Some(dy)) => Step::Wheel(dy.parse()?),
            ("touch", Some(y)) => Step::Touch(y.parse()?),
            ("wait", Some(ms)) => Step::Wait(ms.parse()?),
            ("goto", Some(page)) => match page.parse::<usize>()? {
                0 => bail!("pages are numbered from 1"),
                page => Step::Goto(page - 1),
            },
            _ => return Err(anyhow!("unknown step: {:?}", s)),
        };
        Ok(step)
    }
}

/// Something the deck did, stamped with the virtual time in ms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Started { from: usize, to: usize, offset: i64 },
    Dropped { step: String },
    Mounted { count: usize },
    PageChanged { index: usize },
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Started { from, to, offset } => write!(
                f,
                "transition {} -> {} (offset {}%)",
                from + 1,
                to + 1,
                offset
            ),
            Record::Dropped { step } => write!(f, "no transition for {}", step),
            Record::Mounted { count } => write!(f, "mounted {} pages", count),
            Record::PageChanged { index } => write!(f, "page changed to {}", index + 1),
        }
    }
}

struct PendingCommit {
    due: u64,
    ticket: u64,
}

pub struct Simulation {
    deck: Deck,
    keys: (u16, u16),
    now: u64,
    pending: Option<PendingCommit>,
    changes: Arc<Mutex<Vec<usize>>>,
    records: Vec<(u64, Record)>,
}

impl Simulation {
    pub fn new(config: &AppConfig) -> Self {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let mut deck = Deck::new(config.pages.clone(), config.deck_config());
        deck.set_listener(Box::new(move |index| {
            if let Ok(mut changes) = sink.lock() {
                changes.push(index);
            }
        }));

        Self {
            deck,
            keys: (config.input.key_up, config.input.key_down),
            now: 0,
            pending: None,
            changes,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[(u64, Record)] {
        &self.records
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn apply(&mut self, step: Step) {
        let (key_up, key_down) = self.keys;
        let event = match step {
            Step::Down => InputEvent::Key { code: key_down },
            Step::Up => InputEvent::Key { code: key_up },
            Step::Wheel(delta_y) => InputEvent::Wheel { delta_y },
            Step::Touch(client_y) => InputEvent::TouchMove { client_y },
            Step::TouchEnd => InputEvent::TouchEnd,
            Step::Goto(page) => {
                self.set_target(page);
                return;
            }
            Step::Wait(ms) => {
                self.advance_to(self.now + ms);
                return;
            }
        };

        match self.deck.handle_input(event) {
            Some(transition) => self.begin(transition),
            None => self.record(Record::Dropped {
                step: format!("{:?}", step),
            }),
        }
    }

    /// Let every scheduled commit fire
    pub fn finish(&mut self) {
        while let Some(due) = self.pending.as_ref().map(|p| p.due) {
            self.advance_to(due);
        }
    }

    fn set_target(&mut self, page: usize) {
        match self.deck.set_target(page) {
            JumpOutcome::Started(transition) => self.begin(transition),
            JumpOutcome::PendingMount { mounted, .. } => {
                self.record(Record::Mounted { count: mounted });
                // Next render cycle
                if let Some(transition) = self.deck.resume_pending() {
                    self.begin(transition);
                }
            }
            JumpOutcome::Ignored => self.record(Record::Dropped {
                step: format!("goto:{}", page + 1),
            }),
        }
    }

    fn advance_to(&mut self, until: u64) {
        while let Some(pending) = self.pending.take() {
            if pending.due > until {
                self.pending = Some(pending);
                break;
            }
            self.now = pending.due;
            self.commit(pending.ticket);
        }
        self.now = until;
    }

    fn begin(&mut self, transition: Transition) {
        self.record(Record::Started {
            from: transition.from,
            to: transition.to,
            offset: transition.offset,
        });
        self.pending = Some(PendingCommit {
            due: self.now + transition.commit_after.as_millis() as u64,
            ticket: transition.ticket,
        });
    }

    fn commit(&mut self, ticket: u64) {
        let Some(commit) = self.deck.commit(ticket) else {
            debug!("Stale commit {} ignored", ticket);
            return;
        };

        let changed: Vec<usize> = match self.changes.lock() {
            Ok(mut changes) => changes.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for index in changed {
            self.record(Record::PageChanged { index });
            // The caller re-renders with the page it was told about
            self.deck.set_target(index);
        }
        if commit.mounts_grew {
            self.record(Record::Mounted {
                count: commit.mounted,
            });
        }
    }

    fn record(&mut self, record: Record) {
        self.records.push((self.now, record));
    }
}

pub fn run(config: &AppConfig, steps: &[String]) -> Result<()> {
    let steps = steps
        .iter()
        .map(|s| s.parse::<Step>())
        .collect::<Result<Vec<_>>>()?;

    let mut simulation = Simulation::new(config);
    println!(
        "{} pages, {} mounted, commit delay {:?}",
        simulation.deck().pages().len(),
        simulation.deck().mounted_count(),
        simulation.deck().controller().timing().commit_delay()
    );

    for step in steps {
        simulation.apply(step);
    }
    simulation.finish();

    for (at, record) in simulation.records() {
        println!("[{:>6}ms] {}", at, record);
    }
    println!("Final page: {}", simulation.deck().current_index() + 1);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapdeck_core::Page;

    fn config(pages: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.pages = (0..pages)
            .map(|i| Page::new(format!("Page {}", i + 1), ""))
            .collect();
        config
    }

    fn simulate(pages: usize, steps: &[&str]) -> Simulation {
        let mut sim = Simulation::new(&config(pages));
        for step in steps {
            sim.apply(step.parse().unwrap());
        }
        sim.finish();
        sim
    }

    #[test]
    fn test_parse_steps() {
        assert_eq!("down".parse::<Step>().unwrap(), Step::Down);
        assert_eq!("wheel:-40".parse::<Step>().unwrap(), Step::Wheel(-40.0));
        assert_eq!("touch:120.5".parse::<Step>().unwrap(), Step::Touch(120.5));
        assert_eq!("goto:3".parse::<Step>().unwrap(), Step::Goto(2));
        assert_eq!("wait:200".parse::<Step>().unwrap(), Step::Wait(200));
        assert!("goto:0".parse::<Step>().is_err());
        assert!("wheel".parse::<Step>().is_err());
        assert!("sideways".parse::<Step>().is_err());
    }

    #[test]
    fn test_advance_commits_after_delay() {
        let sim = simulate(4, &["down", "down", "wait:1200"]);
        assert_eq!(
            sim.records(),
            &[
                (0, Record::Started { from: 0, to: 1, offset: -100 }),
                (0, Record::Dropped { step: "Down".to_string() }),
                (1200, Record::PageChanged { index: 1 }),
                (1200, Record::Mounted { count: 3 }),
            ]
        );
        assert_eq!(sim.deck().current_index(), 1);
    }

    #[test]
    fn test_goto_mounts_then_moves() {
        let sim = simulate(4, &["goto:4"]);
        assert_eq!(
            sim.records(),
            &[
                (0, Record::Mounted { count: 4 }),
                (0, Record::Started { from: 0, to: 3, offset: -300 }),
                (1200, Record::PageChanged { index: 3 }),
            ]
        );
    }

    #[test]
    fn test_small_wheel_delta_is_dropped() {
        let sim = simulate(3, &["wheel:0.5", "wheel:-30"]);
        assert_eq!(sim.records().len(), 2);
        assert_eq!(sim.deck().current_index(), 0);
    }

    #[test]
    fn test_touch_needs_reference_sample() {
        let sim = simulate(3, &["touch:200", "touch:150"]);
        assert_eq!(
            sim.records()[1],
            (0, Record::Started { from: 0, to: 1, offset: -100 })
        );
        assert_eq!(sim.deck().current_index(), 1);
    }

    #[test]
    fn test_wait_before_commit_keeps_page() {
        let mut sim = Simulation::new(&config(3));
        sim.apply(Step::Down);
        sim.apply(Step::Wait(1199));
        assert_eq!(sim.deck().current_index(), 0);
        sim.apply(Step::Wait(1));
        assert_eq!(sim.deck().current_index(), 1);
    }
}
