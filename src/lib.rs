pub mod cli;
pub mod config;
pub mod database;
pub mod display;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::MemberDetails;
use crate::ranking::MemberId;
use crate::services::LadderService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_service() -> Result<LadderService> {
    let config = AppConfig::from_env()?;
    LadderService::open(&config)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

pub fn handle_init() -> Result<()> {
    open_service()?;
    println!("Ladder database ready");
    Ok(())
}

pub fn handle_add_member(details: MemberDetails) -> Result<()> {
    let service = open_service()?;
    let member = service.create_member(&details)?;
    println!("Added {} (id {}) at rank {}", member.full_name(), member.id, member.rank);
    Ok(())
}

pub fn handle_update_member(id: MemberId, details: MemberDetails) -> Result<()> {
    let service = open_service()?;
    let member = service.update_member(id, &details)?;
    println!("Updated {} (id {})", member.full_name(), member.id);
    Ok(())
}

pub fn handle_remove_member(id: MemberId) -> Result<()> {
    let service = open_service()?;
    let member = service.delete_member(id)?;
    println!("Removed {} from rank {}", member.full_name(), member.rank);
    Ok(())
}

pub fn handle_record(player1: MemberId, player2: MemberId, score1: i32, score2: i32) -> Result<()> {
    let service = open_service()?;
    let recorded = service.record_match(player1, player2, score1, score2)?;
    let members = service.list_members()?;
    print_lines(display::format_matches(&[recorded], &members));
    Ok(())
}

pub fn handle_preview(
    player1: MemberId,
    player2: MemberId,
    score1: i32,
    score2: i32,
) -> Result<()> {
    let service = open_service()?;
    let adjustment = service.preview_match(player1, player2, score1, score2)?;
    print_lines(display::format_adjustment(&adjustment));
    Ok(())
}

pub fn handle_ladder(json: bool) -> Result<()> {
    let service = open_service()?;
    let members = service.list_members()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&members)?);
    } else {
        print_lines(display::format_standings(&members));
    }
    Ok(())
}

pub fn handle_matches(member: Option<MemberId>, json: bool) -> Result<()> {
    let service = open_service()?;
    let history = match member {
        Some(id) => service.member_history(id)?,
        None => service.list_matches()?,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        let members = service.list_members()?;
        print_lines(display::format_matches(&history, &members));
    }
    Ok(())
}

pub fn handle_verify() -> Result<()> {
    let service = open_service()?;
    let report = service.verify_ladder()?;
    println!("{}", display::format_report(&report));
    if !report.is_dense() {
        anyhow::bail!("Ladder ranks are inconsistent");
    }
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
