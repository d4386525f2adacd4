use std::collections::HashMap;

use colored::Colorize;

use crate::database::{Match, Member};
use crate::ranking::{LadderReport, MemberId, RankAdjustment, RankChange};

pub fn format_standings(members: &[Member]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>4}  {:<28} {:>6}  {}",
        "Rank".bold(),
        "Member".bold(),
        "Games".bold(),
        "Id".bold()
    )];

    lines.extend(members.iter().map(|m| {
        let rank = format!("{:>4}", m.rank);
        let rank = if m.rank <= 3 { rank.yellow().bold() } else { rank.normal() };
        format!("{}  {:<28} {:>6}  {}", rank, m.full_name(), m.games_played, m.id)
    }));
    lines
}

pub fn format_matches(history: &[Match], members: &[Member]) -> Vec<String> {
    let names: HashMap<MemberId, String> = members.iter().map(|m| (m.id, m.full_name())).collect();
    let name_of = |id: MemberId| {
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{} (removed)", id))
    };

    history
        .iter()
        .map(|m| {
            format!(
                "{}  {} {}:{} {}  [{} -> {} | {} -> {}]",
                m.played_at.format("%Y-%m-%d %H:%M"),
                name_of(m.player1_id),
                m.player1_score,
                m.player2_score,
                name_of(m.player2_id),
                m.player1_rank_before,
                movement(m.player1_rank_before, m.player1_rank_after),
                m.player2_rank_before,
                movement(m.player2_rank_before, m.player2_rank_after),
            )
        })
        .collect()
}

pub fn format_adjustment(adjustment: &RankAdjustment) -> Vec<String> {
    let describe = |label: &str, change: &RankChange| {
        format!(
            "  {} member {}: rank {} -> {}",
            label,
            change.member_id,
            change.before,
            movement(change.before, change.after)
        )
    };

    vec![
        format!("Result: {}", adjustment.result.as_str().bold()),
        describe("higher-ranked", &adjustment.higher),
        describe("lower-ranked ", &adjustment.lower),
    ]
}

pub fn format_report(report: &LadderReport) -> String {
    if report.is_dense() {
        format!("{} ranks 1..{} are consistent", "OK".green().bold(), report.members)
    } else {
        format!(
            "{} missing ranks {:?}, duplicated ranks {:?}",
            "BROKEN".red().bold(),
            report.missing,
            report.duplicated
        )
    }
}

fn movement(before: i32, after: i32) -> String {
    let text = after.to_string();
    match after.cmp(&before) {
        std::cmp::Ordering::Less => text.green().to_string(),
        std::cmp::Ordering::Greater => text.red().to_string(),
        std::cmp::Ordering::Equal => text,
    }
}
