use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use citadel_client::{boards::DEFAULT_BOARD, models::VoteDirection};

#[derive(Parser, Debug)]
#[command(name = "citadel", about = "Read and scribe on the boards of the Citadel")]
pub struct Cli {
    #[arg(long, env = "CITADEL_HOST", default_value = "http://localhost:8080")]
    pub host: String,

    /// Where the logged-in username is kept. Defaults to ~/.citadel_user.json
    #[arg(long, env = "CITADEL_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the boards of the library
    Boards,
    /// List scrolls, newest first
    Posts {
        #[arg(long)]
        board: Option<String>,
    },
    /// Print a scroll with its marks
    Show {
        id: i32,
        /// Indent replies by their true depth
        #[arg(long, default_value_t = false)]
        deep_indent: bool,
    },
    /// Open a scroll in the interactive thread view
    Open {
        id: i32,
        #[arg(long, default_value_t = false)]
        deep_indent: bool,
    },
    /// Scribe a new scroll
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = DEFAULT_BOARD)]
        board: String,
        #[arg(long, default_value = "")]
        link: String,
    },
    /// Rewrite the title and/or content of your scroll
    Rewrite {
        id: i32,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Burn your scroll with all its marks
    Burn { id: i32 },
    /// Vote on a scroll. Voting the same way again retracts the vote
    Vote {
        id: i32,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Leave a mark on a scroll
    Comment {
        post_id: i32,
        content: String,
        /// The mark being replied to
        #[arg(long)]
        parent: Option<i32>,
    },
    /// Change the content of your mark
    Amend { id: i32, content: String },
    /// Erase your mark
    Erase { id: i32 },
    /// Create an account and log in with it
    Register {
        username: String,
        #[arg(long, env = "CITADEL_PASSWORD")]
        password: String,
    },
    Login {
        username: String,
        #[arg(long, env = "CITADEL_PASSWORD")]
        password: String,
    },
    Logout,
    /// Print the identity requests are made under
    Whoami,
    /// Check that the backend is up
    Ping,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => VoteDirection::Up,
            Direction::Down => VoteDirection::Down,
        }
    }
}
