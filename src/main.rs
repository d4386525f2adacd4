use anyhow::Result;

use club_ladder::cli::Command;
use club_ladder::domain::MemberDetails;
use club_ladder::{
    handle_add_member, handle_completions, handle_init, handle_ladder, handle_matches,
    handle_preview, handle_record, handle_remove_member, handle_update_member, handle_verify,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Init => handle_init(),
        Command::AddMember {
            name,
            surname,
            email,
            birthday,
        } => handle_add_member(details(name, surname, email, *birthday)),
        Command::UpdateMember {
            id,
            name,
            surname,
            email,
            birthday,
        } => handle_update_member(*id, details(name, surname, email, *birthday)),
        Command::RemoveMember { id } => handle_remove_member(*id),
        Command::Record {
            player1,
            player2,
            score1,
            score2,
        } => handle_record(*player1, *player2, *score1, *score2),
        Command::Preview {
            player1,
            player2,
            score1,
            score2,
        } => handle_preview(*player1, *player2, *score1, *score2),
        Command::Ladder { json } => handle_ladder(*json),
        Command::Matches { member, json } => handle_matches(*member, *json),
        Command::Verify => handle_verify(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

fn details(
    name: &str,
    surname: &str,
    email: &str,
    birthday: Option<chrono::NaiveDate>,
) -> MemberDetails {
    MemberDetails {
        birthday,
        ..MemberDetails::new(name, surname, email)
    }
}
