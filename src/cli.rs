use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::ranking::MemberId;

#[derive(Parser, Debug)]
#[command(author, version, about = "club-ladder: ranking ladder for a club")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Create the database schema if it does not exist yet
    Init,
    /// Add a member at the bottom of the ladder
    AddMember {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<NaiveDate>,
    },
    /// Change a member's personal details
    UpdateMember {
        id: MemberId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<NaiveDate>,
    },
    /// Remove a member; everyone below moves up one place
    RemoveMember { id: MemberId },
    /// Record a match result and update the ladder
    Record {
        player1: MemberId,
        player2: MemberId,
        score1: i32,
        score2: i32,
    },
    /// Show how a result would change the ladder without recording it
    Preview {
        player1: MemberId,
        player2: MemberId,
        score1: i32,
        score2: i32,
    },
    /// Print the current standings
    Ladder {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print match history, newest first
    Matches {
        /// Only matches of this member
        #[arg(short, long)]
        member: Option<MemberId>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check that ranks form an unbroken 1..N sequence
    Verify,
    /// Generate a shell completion script
    Completions { shell: Shell },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(
            parse(&["club_ladder", "record", "8", "3", "1", "0"]),
            Command::Record {
                player1: 8,
                player2: 3,
                score1: 1,
                score2: 0
            }
        );
    }

    #[test]
    fn test_parse_add_member_with_birthday() {
        let command = parse(&[
            "club_ladder",
            "add-member",
            "--name",
            "Judit",
            "--surname",
            "Polgar",
            "--email",
            "judit@club.test",
            "--birthday",
            "1976-07-23",
        ]);

        assert_eq!(
            command,
            Command::AddMember {
                name: "Judit".to_string(),
                surname: "Polgar".to_string(),
                email: "judit@club.test".to_string(),
                birthday: NaiveDate::from_ymd_opt(1976, 7, 23),
            }
        );
    }

    #[test]
    fn test_parse_matches_filter() {
        assert_eq!(
            parse(&["club_ladder", "matches", "-m", "4"]),
            Command::Matches {
                member: Some(4),
                json: false
            }
        );
    }

    #[test]
    fn test_bad_birthday_is_rejected() {
        assert!(
            Cli::try_parse_from([
                "club_ladder",
                "add-member",
                "--name",
                "a",
                "--surname",
                "b",
                "--email",
                "c@d.e",
                "--birthday",
                "yesterday",
            ])
            .is_err()
        );
    }
}
