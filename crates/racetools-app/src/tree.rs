//! Interactive Christmas tree on the terminal
//!
//! Enter starts a sequence, the next Enter is the reaction. `q` quits.

use anyhow::Result;
use racetools_core::reaction::{
    Lamp, LampState, Leaderboard, MemoryLeaderboard, ReactionSequencer, SequencerEvent,
    TreePhase, TreeSnapshot, TreeTiming,
};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(timing: TreeTiming, username: Option<String>, top_limit: usize) -> Result<()> {
    let (mut sequencer, mut events) = ReactionSequencer::new(timing);
    let mut leaderboard = MemoryLeaderboard::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Press Enter to stage, Enter again when the light turns green. 'q' quits.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().eq_ignore_ascii_case("q") {
                    break;
                }
                let phase = sequencer.snapshot().phase;
                if phase == TreePhase::Idle || phase.is_terminal() {
                    sequencer.start();
                } else {
                    sequencer.react();
                }
            }
            Some(event) = events.recv() => match event {
                SequencerEvent::LampsChanged(snapshot) => println!("{}", render(&snapshot)),
                SequencerEvent::Finished(entry) => {
                    println!("{}", entry.feedback());
                    println!("Press Enter to go again.");
                }
                SequencerEvent::LeaderboardEligible(entry) => {
                    if let Some(name) = &username {
                        match leaderboard.submit(name, &entry) {
                            Ok(posted) => println!(
                                "Posted {:.1} ms for {}",
                                posted.reaction_time_ms, posted.username
                            ),
                            Err(e) => tracing::warn!("Leaderboard rejected reaction: {}", e),
                        }
                    }
                }
            }
        }
    }

    sequencer.reset();
    print_summary(&sequencer, &leaderboard, top_limit)
}

fn render(snapshot: &TreeSnapshot) -> String {
    let order = [
        Lamp::PreStage,
        Lamp::Stage,
        Lamp::Amber1,
        Lamp::Amber2,
        Lamp::Amber3,
        Lamp::Go,
    ];
    order
        .iter()
        .map(|&lamp| match snapshot.lamp(lamp) {
            LampState::Off => "( )",
            LampState::Amber => "(Y)",
            LampState::Green => "(G)",
            LampState::Red => "(R)",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_summary(
    sequencer: &ReactionSequencer,
    leaderboard: &MemoryLeaderboard,
    top_limit: usize,
) -> Result<()> {
    let log = sequencer.log();
    if !log.is_empty() {
        println!();
        println!("Session:");
        for entry in &log {
            println!(
                "  #{:<3} {:<8} {:.3}s",
                entry.id,
                entry.classification.as_str(),
                entry.measured_value_seconds
            );
        }
    }

    let top = leaderboard.top(top_limit)?;
    if !top.is_empty() {
        println!();
        println!("Leaderboard:");
        for (rank, entry) in top.iter().enumerate() {
            println!(
                "  {:>2}. {:<16} {:.1} ms",
                rank + 1,
                entry.username,
                entry.reaction_time_ms
            );
        }
    }
    Ok(())
}
